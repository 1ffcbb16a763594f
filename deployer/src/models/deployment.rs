//! Deployment models

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DeployerError;

/// Deployment topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    #[default]
    Web,
    Static,
    Background,
    Cron,
    Function,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Web => "web",
            ServiceType::Static => "static",
            ServiceType::Background => "background",
            ServiceType::Cron => "cron",
            ServiceType::Function => "function",
        }
    }
}

/// Provider-agnostic description of what to deploy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    /// Service name, must not be blank
    pub name: String,

    #[serde(default)]
    pub service_type: ServiceType,

    /// Runtime identifier such as 'node', 'python' or 'static'
    pub environment: String,

    /// Build command, provider default when absent
    #[serde(default)]
    pub build_command: Option<String>,

    /// Start command, provider default when absent
    #[serde(default)]
    pub start_command: Option<String>,

    #[serde(default)]
    pub root_directory: Option<String>,

    #[serde(default)]
    pub static_publish_path: Option<String>,

    #[serde(default)]
    pub env_vars: HashMap<String, String>,

    /// Redeploy on pushes to `branch`; passed through to the provider
    #[serde(default = "default_true")]
    pub auto_deploy: bool,

    #[serde(default = "default_branch")]
    pub branch: String,

    /// Hostnames attached after creation, in order
    #[serde(default)]
    pub custom_domains: Vec<String>,

    /// Framework hint, e.g. 'next' or 'react'
    #[serde(default)]
    pub framework: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_branch() -> String {
    "main".to_string()
}

impl DeploymentSpec {
    /// Create a spec with provider defaults for everything optional
    pub fn new(
        name: impl Into<String>,
        service_type: ServiceType,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            service_type,
            environment: environment.into(),
            build_command: None,
            start_command: None,
            root_directory: None,
            static_publish_path: None,
            env_vars: HashMap::new(),
            auto_deploy: true,
            branch: default_branch(),
            custom_domains: Vec::new(),
            framework: None,
        }
    }

    pub fn with_build_command(mut self, command: impl Into<String>) -> Self {
        self.build_command = Some(command.into());
        self
    }

    pub fn with_start_command(mut self, command: impl Into<String>) -> Self {
        self.start_command = Some(command.into());
        self
    }

    pub fn with_root_directory(mut self, dir: impl Into<String>) -> Self {
        self.root_directory = Some(dir.into());
        self
    }

    pub fn with_static_publish_path(mut self, path: impl Into<String>) -> Self {
        self.static_publish_path = Some(path.into());
        self
    }

    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_auto_deploy(mut self, auto_deploy: bool) -> Self {
        self.auto_deploy = auto_deploy;
        self
    }

    pub fn with_custom_domain(mut self, domain: impl Into<String>) -> Self {
        self.custom_domains.push(domain.into());
        self
    }

    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = Some(framework.into());
        self
    }

    /// Check the fields every provider requires
    pub fn validate(&self) -> Result<(), DeployerError> {
        if self.name.trim().is_empty() {
            return Err(DeployerError::Validation(
                "deployment name must not be empty".to_string(),
            ));
        }
        if self.environment.trim().is_empty() {
            return Err(DeployerError::Validation(
                "deployment environment must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Shared deployment status vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Pending,
    Building,
    Deploying,
    Success,
    Failed,
    Cancelled,
}

impl DeploymentStatus {
    pub const ALL: [DeploymentStatus; 6] = [
        DeploymentStatus::Pending,
        DeploymentStatus::Building,
        DeploymentStatus::Deploying,
        DeploymentStatus::Success,
        DeploymentStatus::Failed,
        DeploymentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::Pending => "pending",
            DeploymentStatus::Building => "building",
            DeploymentStatus::Deploying => "deploying",
            DeploymentStatus::Success => "success",
            DeploymentStatus::Failed => "failed",
            DeploymentStatus::Cancelled => "cancelled",
        }
    }

    /// No further transitions happen from this status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeploymentStatus::Success | DeploymentStatus::Failed | DeploymentStatus::Cancelled
        )
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized outcome of one provider's deploy attempt
///
/// Built only through [`DeploymentResult::success`] and
/// [`DeploymentResult::failed`]: a successful result always carries a URL
/// and no error, a failed one always carries an error and no URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResult {
    pub provider: String,
    pub service_id: String,
    pub deployment_id: String,
    pub url: String,
    pub status: DeploymentStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeploymentResult {
    /// A successful deployment; an empty URL turns it into a failure
    pub fn success(
        provider: impl Into<String>,
        service_id: impl Into<String>,
        deployment_id: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        let provider = provider.into();
        let url = url.into();
        if url.trim().is_empty() {
            return Self::failed(provider, "provider did not report a deployment URL");
        }

        Self {
            provider,
            service_id: service_id.into(),
            deployment_id: deployment_id.into(),
            url,
            status: DeploymentStatus::Success,
            error: None,
        }
    }

    /// A failed deployment
    pub fn failed(provider: impl Into<String>, error: impl Into<String>) -> Self {
        let mut error = error.into();
        if error.trim().is_empty() {
            error = "deployment failed without an error message".to_string();
        }

        Self {
            provider: provider.into(),
            service_id: String::new(),
            deployment_id: String::new(),
            url: String::new(),
            status: DeploymentStatus::Failed,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == DeploymentStatus::Success
    }

    /// Copy of this result with a refreshed status
    ///
    /// A success status is only taken when the result has a URL, and a
    /// failed status keeps or creates an error so the invariants hold.
    pub fn with_status(&self, status: DeploymentStatus) -> Self {
        let mut updated = self.clone();
        match status {
            DeploymentStatus::Success if updated.url.is_empty() => return updated,
            DeploymentStatus::Failed => {
                if updated.error.is_none() {
                    updated.error = Some("provider reported the deployment as failed".to_string());
                }
                updated.url.clear();
            }
            _ => updated.error = None,
        }
        updated.status = status;
        updated
    }
}
