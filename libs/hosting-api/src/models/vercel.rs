//! Vercel REST models

use serde::{Deserialize, Serialize};

/// Project creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    pub git_repository: GitRepository,

    /// Framework preset, 'other' when unknown
    pub framework: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_directory: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

/// Linked git repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitRepository {
    #[serde(rename = "type")]
    pub provider: String,

    /// Repository slug, 'owner/name'
    pub repo: String,
}

/// A Vercel project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,
}

/// Deployment creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDeploymentRequest {
    pub name: String,
    pub target: String,
}

/// A Vercel deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: String,

    /// Deployment host, usually without a scheme
    #[serde(default)]
    pub url: Option<String>,

    /// Native status, e.g. 'BUILDING' or 'READY'
    #[serde(default)]
    pub ready_state: Option<String>,

    /// Newer API versions report the same value as `status`
    #[serde(default)]
    pub status: Option<String>,
}

impl Deployment {
    pub fn native_status(&self) -> Option<&str> {
        self.ready_state.as_deref().or(self.status.as_deref())
    }
}

/// Deployment listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentList {
    #[serde(default)]
    pub deployments: Vec<serde_json::Value>,
}

/// Domain request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDomainRequest {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

/// Project environment variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvVarRequest {
    pub key: String,
    pub value: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub target: Vec<String>,
}

impl EnvVarRequest {
    /// An encrypted variable visible to production and preview builds
    pub fn encrypted(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind: "encrypted".to_string(),
            target: vec!["production".to_string(), "preview".to_string()],
        }
    }
}
