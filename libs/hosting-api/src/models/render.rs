//! Render REST models

use serde::{Deserialize, Serialize};

/// Service creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub name: String,

    /// Service type: 'web', 'static', 'background', 'cron', 'function'
    #[serde(rename = "type")]
    pub service_type: String,

    /// Runtime environment, e.g. 'node' or 'python'
    pub env: String,

    pub repo: String,
    pub branch: String,
    pub auto_deploy: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_command: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_publish_path: Option<String>,
}

/// Service creation response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceResponse {
    pub service: Service,

    /// ID of the initial deploy Render starts on creation
    #[serde(default)]
    pub deploy_id: Option<String>,

    #[serde(default)]
    pub latest_deploy: Option<DeployRef>,
}

impl CreateServiceResponse {
    /// ID of the first deploy, wherever this response carries it
    pub fn initial_deploy_id(&self) -> Option<&str> {
        self.deploy_id
            .as_deref()
            .or_else(|| self.latest_deploy.as_ref().map(|d| d.id.as_str()))
            .or_else(|| self.service.latest_deploy.as_ref().map(|d| d.id.as_str()))
            .filter(|id| !id.is_empty())
    }
}

/// A Render service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub service_details: Option<ServiceDetails>,

    #[serde(default)]
    pub latest_deploy: Option<DeployRef>,
}

/// Reference to a deploy by ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployRef {
    pub id: String,
}

/// Type-specific service details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDetails {
    #[serde(default)]
    pub url: Option<String>,
}

/// Environment variable request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvVarRequest {
    pub key: String,
    pub value: String,
}

/// Custom domain request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomDomainRequest {
    pub name: String,
}

/// A single deploy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deploy {
    pub id: String,

    /// Native status, e.g. 'build_in_progress' or 'live'
    #[serde(default)]
    pub status: Option<String>,
}
