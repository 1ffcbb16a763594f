//! Render adapter

use async_trait::async_trait;
use hosting_api::models::render::{
    CreateServiceRequest, CreateServiceResponse, CustomDomainRequest, Deploy, EnvVarRequest,
};
use secrecy::SecretString;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::errors::DeployerError;
use crate::http::client::HttpClient;
use crate::models::deployment::{DeploymentResult, DeploymentSpec, DeploymentStatus};
use crate::providers::{
    attach_domains, sorted_env_vars, HostingProvider, ProviderKind, ProviderOptions,
};

pub const RENDER_API_URL: &str = "https://api.render.com/v1";

/// Render REST adapter
pub struct RenderProvider {
    client: HttpClient,
}

impl RenderProvider {
    pub fn new(api_key: SecretString, options: &ProviderOptions) -> Result<Self, DeployerError> {
        let base_url = options.base_url.as_deref().unwrap_or(RENDER_API_URL);
        Ok(Self {
            client: HttpClient::new(base_url, api_key, options.timeout)?,
        })
    }

    fn create_request(spec: &DeploymentSpec, repo_url: &str) -> CreateServiceRequest {
        CreateServiceRequest {
            name: spec.name.clone(),
            service_type: spec.service_type.as_str().to_string(),
            env: spec.environment.clone(),
            repo: repo_url.to_string(),
            branch: spec.branch.clone(),
            auto_deploy: spec.auto_deploy,
            build_command: spec.build_command.clone(),
            start_command: spec.start_command.clone(),
            root_dir: spec.root_directory.clone(),
            static_publish_path: spec.static_publish_path.clone(),
        }
    }

    async fn set_environment_variables(&self, service_id: &str, spec: &DeploymentSpec) {
        for (key, value) in sorted_env_vars(spec) {
            let body = EnvVarRequest {
                key: key.clone(),
                value: value.clone(),
            };
            let path = format!("/services/{}/env-vars", service_id);
            if let Err(e) = self.client.post::<Value, _>(&path, &body).await {
                warn!("Failed to set Render env var {}: {}", key, e);
            }
        }
    }
}

#[async_trait]
impl HostingProvider for RenderProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Render
    }

    async fn deploy(&self, spec: &DeploymentSpec, repo_url: &str) -> DeploymentResult {
        if let Err(e) = spec.validate() {
            return DeploymentResult::failed(self.kind().as_str(), e.to_string());
        }

        let request = Self::create_request(spec, repo_url);
        let created: CreateServiceResponse = match self.client.post("/services", &request).await {
            Ok(created) => created,
            Err(e) => {
                error!("Render deployment failed: {}", e);
                let e = DeployerError::step("Failed to create Render service", e);
                return DeploymentResult::failed(self.kind().as_str(), e.to_string());
            }
        };

        let service_id = created.service.id.clone();
        info!("Created Render service {} ({})", spec.name, service_id);

        if !spec.env_vars.is_empty() {
            self.set_environment_variables(&service_id, spec).await;
        }
        attach_domains(self, &service_id, &spec.custom_domains).await;

        let url = created
            .service
            .service_details
            .as_ref()
            .and_then(|details| details.url.clone())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| format!("https://{}.onrender.com", spec.name));

        DeploymentResult::success(
            self.kind().as_str(),
            service_id,
            created.initial_deploy_id().unwrap_or_default(),
            url,
        )
    }

    async fn get_status(&self, service_id: &str, deployment_id: &str) -> DeploymentStatus {
        let path = format!("/services/{}/deploys/{}", service_id, deployment_id);
        match self.client.get::<Deploy>(&path).await {
            Ok(deploy) => map_status(deploy.status.as_deref().unwrap_or_default()),
            Err(e) => {
                error!("Failed to get Render deployment status: {}", e);
                DeploymentStatus::Failed
            }
        }
    }

    async fn list_deployments(&self, service_id: &str) -> Vec<Value> {
        let path = format!("/services/{}/deploys", service_id);
        match self.client.get::<Vec<Value>>(&path).await {
            Ok(deploys) => deploys,
            Err(e) => {
                error!("Failed to list Render deployments: {}", e);
                Vec::new()
            }
        }
    }

    async fn add_custom_domain(
        &self,
        service_id: &str,
        domain: &str,
    ) -> Result<Value, DeployerError> {
        let path = format!("/services/{}/custom-domains", service_id);
        let body = CustomDomainRequest {
            name: domain.to_string(),
        };
        self.client.post(&path, &body).await
    }

    async fn test_connection(&self) -> bool {
        match self.client.get::<Value>("/services?limit=1").await {
            Ok(_) => true,
            Err(e) => {
                error!("Render connection test failed: {}", e);
                false
            }
        }
    }
}

/// Map a Render deploy status onto the shared vocabulary
pub fn map_status(native: &str) -> DeploymentStatus {
    match native {
        "created" | "pending" => DeploymentStatus::Pending,
        "build_in_progress" | "building" => DeploymentStatus::Building,
        "update_in_progress" | "deploying" => DeploymentStatus::Deploying,
        "live" => DeploymentStatus::Success,
        "canceled" | "deactivated" => DeploymentStatus::Cancelled,
        "failed" | "build_failed" | "update_failed" | "pre_deploy_failed" => {
            DeploymentStatus::Failed
        }
        _ => DeploymentStatus::Failed,
    }
}
