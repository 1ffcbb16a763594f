//! Vercel adapter

use async_trait::async_trait;
use hosting_api::models::vercel::{
    AddDomainRequest, CreateDeploymentRequest, CreateProjectRequest, Deployment, DeploymentList,
    EnvVarRequest, GitRepository, Project,
};
use secrecy::SecretString;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::errors::DeployerError;
use crate::http::client::HttpClient;
use crate::models::deployment::{DeploymentResult, DeploymentSpec, DeploymentStatus};
use crate::providers::{
    attach_domains, ensure_scheme, repo_slug, sorted_env_vars, HostingProvider, ProviderKind,
    ProviderOptions,
};

pub const VERCEL_API_URL: &str = "https://api.vercel.com/v1";

/// Vercel REST adapter
///
/// Deploys in two steps: create the project linked to the repository, then
/// trigger a production deployment of it.
pub struct VercelProvider {
    client: HttpClient,
    team_id: Option<String>,
}

impl VercelProvider {
    pub fn new(api_key: SecretString, options: &ProviderOptions) -> Result<Self, DeployerError> {
        let base_url = options.base_url.as_deref().unwrap_or(VERCEL_API_URL);
        Ok(Self {
            client: HttpClient::new(base_url, api_key, options.timeout)?,
            team_id: options.team_id.clone(),
        })
    }

    fn project_request(&self, spec: &DeploymentSpec, slug: String) -> CreateProjectRequest {
        CreateProjectRequest {
            name: spec.name.clone(),
            git_repository: GitRepository {
                provider: "github".to_string(),
                repo: slug,
            },
            framework: spec.framework.clone().unwrap_or_else(|| "other".to_string()),
            build_command: spec.build_command.clone(),
            output_directory: spec.static_publish_path.clone(),
            root_directory: spec.root_directory.clone(),
            team_id: self.team_id.clone(),
        }
    }

    async fn create_and_trigger(
        &self,
        spec: &DeploymentSpec,
        repo_url: &str,
    ) -> Result<(Project, Deployment), DeployerError> {
        let slug = repo_slug(repo_url)?;
        let project: Project = self
            .client
            .post("/projects", &self.project_request(spec, slug))
            .await
            .map_err(|e| DeployerError::step("Failed to create Vercel project", e))?;
        info!("Created Vercel project {} ({})", spec.name, project.id);

        if !spec.env_vars.is_empty() {
            self.set_environment_variables(&project.id, spec).await;
        }

        let path = format!("/projects/{}/deployments", project.id);
        let body = CreateDeploymentRequest {
            name: spec.name.clone(),
            target: "production".to_string(),
        };
        let deployment: Deployment = self
            .client
            .post(&path, &body)
            .await
            .map_err(|e| DeployerError::step("Failed to trigger Vercel deployment", e))?;

        Ok((project, deployment))
    }

    async fn set_environment_variables(&self, project_id: &str, spec: &DeploymentSpec) {
        let path = format!("/projects/{}/env", project_id);
        for (key, value) in sorted_env_vars(spec) {
            let body = EnvVarRequest::encrypted(key.as_str(), value.as_str());
            if let Err(e) = self.client.post::<Value, _>(&path, &body).await {
                warn!("Failed to set Vercel env var {}: {}", key, e);
            }
        }
    }
}

#[async_trait]
impl HostingProvider for VercelProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Vercel
    }

    async fn deploy(&self, spec: &DeploymentSpec, repo_url: &str) -> DeploymentResult {
        if let Err(e) = spec.validate() {
            return DeploymentResult::failed(self.kind().as_str(), e.to_string());
        }

        let (project, deployment) = match self.create_and_trigger(spec, repo_url).await {
            Ok(created) => created,
            Err(e) => {
                error!("Vercel deployment failed: {}", e);
                return DeploymentResult::failed(self.kind().as_str(), e.to_string());
            }
        };

        attach_domains(self, &project.id, &spec.custom_domains).await;

        let url = deployment
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .map(ensure_scheme)
            .unwrap_or_default();

        DeploymentResult::success(self.kind().as_str(), project.id, deployment.id, url)
    }

    async fn get_status(&self, _service_id: &str, deployment_id: &str) -> DeploymentStatus {
        let path = format!("/deployments/{}", deployment_id);
        match self.client.get::<Deployment>(&path).await {
            Ok(deployment) => map_status(deployment.native_status().unwrap_or_default()),
            Err(e) => {
                error!("Failed to get Vercel deployment status: {}", e);
                DeploymentStatus::Failed
            }
        }
    }

    async fn list_deployments(&self, service_id: &str) -> Vec<Value> {
        let path = format!("/projects/{}/deployments", service_id);
        match self.client.get::<DeploymentList>(&path).await {
            Ok(list) => list.deployments,
            Err(e) => {
                error!("Failed to list Vercel deployments: {}", e);
                Vec::new()
            }
        }
    }

    async fn add_custom_domain(
        &self,
        service_id: &str,
        domain: &str,
    ) -> Result<Value, DeployerError> {
        let path = format!("/projects/{}/domains", service_id);
        let body = AddDomainRequest {
            name: domain.to_string(),
            team_id: self.team_id.clone(),
        };
        self.client.post(&path, &body).await
    }

    async fn test_connection(&self) -> bool {
        match self.client.get::<Value>("/projects?limit=1").await {
            Ok(_) => true,
            Err(e) => {
                error!("Vercel connection test failed: {}", e);
                false
            }
        }
    }
}

/// Map a Vercel `readyState` onto the shared vocabulary
pub fn map_status(native: &str) -> DeploymentStatus {
    match native {
        "INITIALIZING" | "QUEUED" => DeploymentStatus::Pending,
        "BUILDING" => DeploymentStatus::Building,
        "DEPLOYING" => DeploymentStatus::Deploying,
        "READY" => DeploymentStatus::Success,
        "ERROR" => DeploymentStatus::Failed,
        "CANCELED" => DeploymentStatus::Cancelled,
        _ => DeploymentStatus::Failed,
    }
}
