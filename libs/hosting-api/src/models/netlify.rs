//! Netlify REST models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Site creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSiteRequest {
    pub name: String,
    pub repo: SiteRepo,
}

/// Continuous deployment settings of a site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteRepo {
    /// Git host, 'github'
    pub provider: String,

    /// Repository slug, 'owner/name'
    pub repo: String,

    pub branch: String,

    /// Build command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,

    /// Publish directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// Base directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
}

/// A Netlify site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: String,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub ssl_url: Option<String>,
}

impl Site {
    /// Preferred public URL, HTTPS first
    pub fn public_url(&self) -> Option<&str> {
        self.ssl_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.url.as_deref().filter(|u| !u.is_empty()))
    }
}

/// A Netlify deploy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deploy {
    pub id: String,

    /// Native state, e.g. 'building' or 'ready'
    #[serde(default)]
    pub state: Option<String>,
}

/// Custom domain request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomDomainRequest {
    pub domain: String,
}

/// Partial site update carrying build environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSiteEnvRequest {
    pub build_settings: BuildSettings,
}

/// Build settings subset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSettings {
    pub env: HashMap<String, String>,
}
