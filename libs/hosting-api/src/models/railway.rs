//! Railway GraphQL models and documents

use serde::{Deserialize, Serialize};

pub const PROJECT_CREATE: &str = r#"
mutation CreateProject($name: String!, $repoUrl: String!, $branch: String) {
    projectCreate(input: { name: $name, repoUrl: $repoUrl, branch: $branch }) {
        project {
            id
            name
            deployments {
                id
                status
                url
                staticUrl
            }
        }
    }
}
"#;

pub const DEPLOYMENT_STATUS: &str = r#"
query GetDeployment($id: String!) {
    deployment(id: $id) {
        status
    }
}
"#;

pub const PROJECT_DEPLOYMENTS: &str = r#"
query GetProject($id: String!) {
    project(id: $id) {
        deployments {
            id
            status
            url
            createdAt
        }
    }
}
"#;

pub const DOMAIN_CREATE: &str = r#"
mutation AddDomain($projectId: String!, $domain: String!) {
    domainCreate(input: { projectId: $projectId, domain: $domain }) {
        domain {
            id
            domain
        }
    }
}
"#;

pub const VARIABLE_UPSERT: &str = r#"
mutation UpsertVariable($projectId: String!, $name: String!, $value: String!) {
    variableUpsert(input: { projectId: $projectId, name: $name, value: $value })
}
"#;

pub const ME: &str = r#"
query Me {
    me {
        id
    }
}
"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectVariables {
    pub name: String,
    pub repo_url: String,
    pub branch: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdVariables {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainVariables {
    pub project_id: String,
    pub domain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableUpsertVariables {
    pub project_id: String,
    pub name: String,
    pub value: String,
}

/// `projectCreate` result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreateData {
    pub project_create: ProjectPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPayload {
    pub project: Project,
}

/// A Railway project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub deployments: Vec<Deployment>,
}

/// A Railway deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: String,

    /// Native status, e.g. 'BUILDING' or 'SUCCESS'
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub static_url: Option<String>,
}

/// `deployment(id)` result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentData {
    #[serde(default)]
    pub deployment: Option<DeploymentStatusNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentStatusNode {
    #[serde(default)]
    pub status: Option<String>,
}

/// `project(id).deployments` result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDeploymentsData {
    #[serde(default)]
    pub project: Option<ProjectDeployments>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDeployments {
    #[serde(default)]
    pub deployments: Vec<serde_json::Value>,
}

/// `domainCreate` result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainCreateData {
    pub domain_create: DomainPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainPayload {
    pub domain: serde_json::Value,
}

/// `me` result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeData {
    pub me: Option<serde_json::Value>,
}
