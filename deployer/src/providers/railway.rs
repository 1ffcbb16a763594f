//! Railway adapter
//!
//! Railway speaks GraphQL. Creating a project from a repository also starts
//! its first deployment, so `deploy` is a single mutation followed by the
//! best-effort variable and domain calls.

use async_trait::async_trait;
use hosting_api::models::railway::{
    self, CreateProjectVariables, DeploymentData, DomainCreateData, DomainVariables, IdVariables,
    MeData, Project, ProjectCreateData, ProjectDeploymentsData, VariableUpsertVariables,
};
use secrecy::SecretString;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::errors::DeployerError;
use crate::http::client::HttpClient;
use crate::models::deployment::{DeploymentResult, DeploymentSpec, DeploymentStatus};
use crate::providers::{
    attach_domains, ensure_scheme, sorted_env_vars, HostingProvider, ProviderKind,
    ProviderOptions,
};

pub const RAILWAY_API_URL: &str = "https://backboard.railway.app/graphql/v2";

/// Railway GraphQL adapter
pub struct RailwayProvider {
    client: HttpClient,
}

impl RailwayProvider {
    pub fn new(api_key: SecretString, options: &ProviderOptions) -> Result<Self, DeployerError> {
        let base_url = options.base_url.as_deref().unwrap_or(RAILWAY_API_URL);
        Ok(Self {
            client: HttpClient::new(base_url, api_key, options.timeout)?,
        })
    }

    async fn create_project(
        &self,
        spec: &DeploymentSpec,
        repo_url: &str,
    ) -> Result<Project, DeployerError> {
        let variables = CreateProjectVariables {
            name: spec.name.clone(),
            repo_url: repo_url.to_string(),
            branch: spec.branch.clone(),
        };
        let data: ProjectCreateData = self
            .client
            .graphql(railway::PROJECT_CREATE, variables)
            .await
            .map_err(|e| DeployerError::step("Failed to create Railway project", e))?;

        Ok(data.project_create.project)
    }

    async fn set_environment_variables(&self, project_id: &str, spec: &DeploymentSpec) {
        for (key, value) in sorted_env_vars(spec) {
            let variables = VariableUpsertVariables {
                project_id: project_id.to_string(),
                name: key.clone(),
                value: value.clone(),
            };
            if let Err(e) = self
                .client
                .graphql::<_, Value>(railway::VARIABLE_UPSERT, variables)
                .await
            {
                warn!("Failed to set Railway variable {}: {}", key, e);
            }
        }
    }
}

#[async_trait]
impl HostingProvider for RailwayProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Railway
    }

    /// Create the project and report its first deployment
    ///
    /// When Railway has not assigned a public domain yet, the URL is the
    /// project's dashboard page (`https://railway.app/project/{id}`), not the
    /// deployed service.
    async fn deploy(&self, spec: &DeploymentSpec, repo_url: &str) -> DeploymentResult {
        if let Err(e) = spec.validate() {
            return DeploymentResult::failed(self.kind().as_str(), e.to_string());
        }

        let project = match self.create_project(spec, repo_url).await {
            Ok(project) => project,
            Err(e) => {
                error!("Railway deployment failed: {}", e);
                return DeploymentResult::failed(self.kind().as_str(), e.to_string());
            }
        };
        info!("Created Railway project {} ({})", spec.name, project.id);

        if !spec.env_vars.is_empty() {
            self.set_environment_variables(&project.id, spec).await;
        }
        attach_domains(self, &project.id, &spec.custom_domains).await;

        let deployment = project.deployments.first();
        let deployment_id = deployment.map(|d| d.id.clone()).unwrap_or_default();
        let url = deployment
            .and_then(|d| d.static_url.as_deref().or(d.url.as_deref()))
            .filter(|url| !url.is_empty())
            .map(ensure_scheme)
            // dashboard link, not a reachable service
            .unwrap_or_else(|| format!("https://railway.app/project/{}", project.id));

        DeploymentResult::success(self.kind().as_str(), project.id.clone(), deployment_id, url)
    }

    async fn get_status(&self, _service_id: &str, deployment_id: &str) -> DeploymentStatus {
        let variables = IdVariables {
            id: deployment_id.to_string(),
        };
        match self
            .client
            .graphql::<_, DeploymentData>(railway::DEPLOYMENT_STATUS, variables)
            .await
        {
            Ok(data) => {
                let native = data.deployment.and_then(|d| d.status).unwrap_or_default();
                map_status(&native)
            }
            Err(e) => {
                error!("Failed to get Railway deployment status: {}", e);
                DeploymentStatus::Failed
            }
        }
    }

    async fn list_deployments(&self, service_id: &str) -> Vec<Value> {
        let variables = IdVariables {
            id: service_id.to_string(),
        };
        match self
            .client
            .graphql::<_, ProjectDeploymentsData>(railway::PROJECT_DEPLOYMENTS, variables)
            .await
        {
            Ok(data) => data.project.map(|p| p.deployments).unwrap_or_default(),
            Err(e) => {
                error!("Failed to list Railway deployments: {}", e);
                Vec::new()
            }
        }
    }

    async fn add_custom_domain(
        &self,
        service_id: &str,
        domain: &str,
    ) -> Result<Value, DeployerError> {
        let variables = DomainVariables {
            project_id: service_id.to_string(),
            domain: domain.to_string(),
        };
        let data: DomainCreateData = self.client.graphql(railway::DOMAIN_CREATE, variables).await?;
        Ok(data.domain_create.domain)
    }

    async fn test_connection(&self) -> bool {
        match self.client.graphql::<_, MeData>(railway::ME, Value::Null).await {
            Ok(data) => data.me.is_some(),
            Err(e) => {
                error!("Railway connection test failed: {}", e);
                false
            }
        }
    }
}

/// Map a Railway deployment status onto the shared vocabulary
pub fn map_status(native: &str) -> DeploymentStatus {
    match native {
        "INITIALIZING" | "QUEUED" | "WAITING" | "PENDING" => DeploymentStatus::Pending,
        "BUILDING" => DeploymentStatus::Building,
        "DEPLOYING" => DeploymentStatus::Deploying,
        "SUCCESS" => DeploymentStatus::Success,
        "FAILED" | "CRASHED" => DeploymentStatus::Failed,
        "CANCELLED" | "REMOVED" | "REMOVING" | "SKIPPED" => DeploymentStatus::Cancelled,
        _ => DeploymentStatus::Failed,
    }
}
