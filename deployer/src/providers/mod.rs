//! Hosting provider adapters
//!
//! Every hosting backend implements [`HostingProvider`]. The orchestrator
//! only ever sees `Arc<dyn HostingProvider>`; concrete adapters are built by
//! [`ProviderFactory`].

pub mod netlify;
pub mod railway;
pub mod render;
pub mod vercel;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

use crate::errors::DeployerError;
use crate::http::client::DEFAULT_TIMEOUT;
use crate::models::deployment::{DeploymentResult, DeploymentSpec, DeploymentStatus};

pub use netlify::NetlifyProvider;
pub use railway::RailwayProvider;
pub use render::RenderProvider;
pub use vercel::VercelProvider;

/// Hosting provider contract
#[async_trait]
pub trait HostingProvider: Send + Sync {
    /// Which backend this adapter talks to
    fn kind(&self) -> ProviderKind;

    /// Create the service and start its first deployment
    ///
    /// Never fails: provider and transport errors come back as a failed
    /// [`DeploymentResult`].
    async fn deploy(&self, spec: &DeploymentSpec, repo_url: &str) -> DeploymentResult;

    /// Current status of a deployment, `Failed` when it cannot be read
    async fn get_status(&self, service_id: &str, deployment_id: &str) -> DeploymentStatus;

    /// Raw deployment records, empty when they cannot be read
    async fn list_deployments(&self, service_id: &str) -> Vec<Value>;

    /// Attach a custom domain to an existing service
    async fn add_custom_domain(&self, service_id: &str, domain: &str)
        -> Result<Value, DeployerError>;

    /// Check that the credentials are accepted
    async fn test_connection(&self) -> bool;
}

/// Known hosting providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Render,
    Vercel,
    Netlify,
    Railway,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Render,
        ProviderKind::Vercel,
        ProviderKind::Netlify,
        ProviderKind::Railway,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Render => "render",
            ProviderKind::Vercel => "vercel",
            ProviderKind::Netlify => "netlify",
            ProviderKind::Railway => "railway",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = DeployerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "render" => Ok(ProviderKind::Render),
            "vercel" => Ok(ProviderKind::Vercel),
            "netlify" => Ok(ProviderKind::Netlify),
            "railway" => Ok(ProviderKind::Railway),
            _ => Err(DeployerError::UnsupportedProvider(s.to_string())),
        }
    }
}

/// Adapter-specific options supplied alongside the API key
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// Vercel team scope
    pub team_id: Option<String>,

    /// Override of the provider's API base URL
    pub base_url: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            team_id: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProviderOptions {
    pub fn with_team_id(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Factory for creating provider adapters
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the adapter for `kind`
    pub fn create(
        kind: ProviderKind,
        api_key: SecretString,
        options: &ProviderOptions,
    ) -> Result<Arc<dyn HostingProvider>, DeployerError> {
        let provider: Arc<dyn HostingProvider> = match kind {
            ProviderKind::Render => Arc::new(RenderProvider::new(api_key, options)?),
            ProviderKind::Vercel => Arc::new(VercelProvider::new(api_key, options)?),
            ProviderKind::Netlify => Arc::new(NetlifyProvider::new(api_key, options)?),
            ProviderKind::Railway => Arc::new(RailwayProvider::new(api_key, options)?),
        };

        Ok(provider)
    }
}

/// Add every domain in order; one failure does not stop the rest
pub(crate) async fn attach_domains<P: HostingProvider + ?Sized>(
    provider: &P,
    service_id: &str,
    domains: &[String],
) {
    for domain in domains {
        match provider.add_custom_domain(service_id, domain).await {
            Ok(_) => info!("Added domain {} to {} service {}", domain, provider.kind(), service_id),
            Err(e) => warn!(
                "Failed to add domain {} to {} service {}: {}",
                domain,
                provider.kind(),
                service_id,
                e
            ),
        }
    }
}

/// `owner/name` slug of a GitHub repository URL
pub(crate) fn repo_slug(repo_url: &str) -> Result<String, DeployerError> {
    let url = Url::parse(repo_url)
        .map_err(|e| DeployerError::Validation(format!("invalid repository URL {repo_url}: {e}")))?;

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [owner, name, ..] => Ok(format!("{}/{}", owner, name.trim_end_matches(".git"))),
        _ => Err(DeployerError::Validation(format!(
            "repository URL {repo_url} does not name an owner and repository"
        ))),
    }
}

/// Prefix bare hostnames with `https://`
pub(crate) fn ensure_scheme(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// Environment variables of a deployment, sorted by key
pub(crate) fn sorted_env_vars(spec: &DeploymentSpec) -> Vec<(&String, &String)> {
    let mut vars: Vec<_> = spec.env_vars.iter().collect();
    vars.sort();
    vars
}
