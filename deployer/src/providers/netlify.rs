//! Netlify adapter

use std::collections::HashMap;

use async_trait::async_trait;
use hosting_api::models::netlify::{
    BuildSettings, CreateSiteRequest, CustomDomainRequest, Deploy, Site, SiteRepo,
    UpdateSiteEnvRequest,
};
use secrecy::SecretString;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::errors::DeployerError;
use crate::http::client::HttpClient;
use crate::models::deployment::{DeploymentResult, DeploymentSpec, DeploymentStatus};
use crate::providers::{
    attach_domains, repo_slug, sorted_env_vars, HostingProvider, ProviderKind, ProviderOptions,
};

pub const NETLIFY_API_URL: &str = "https://api.netlify.com/api/v1";

/// Netlify REST adapter
pub struct NetlifyProvider {
    client: HttpClient,
}

impl NetlifyProvider {
    pub fn new(api_key: SecretString, options: &ProviderOptions) -> Result<Self, DeployerError> {
        let base_url = options.base_url.as_deref().unwrap_or(NETLIFY_API_URL);
        Ok(Self {
            client: HttpClient::new(base_url, api_key, options.timeout)?,
        })
    }

    fn site_request(spec: &DeploymentSpec, slug: String) -> CreateSiteRequest {
        CreateSiteRequest {
            name: spec.name.clone(),
            repo: SiteRepo {
                provider: "github".to_string(),
                repo: slug,
                branch: spec.branch.clone(),
                cmd: spec.build_command.clone(),
                dir: spec.static_publish_path.clone(),
                base: spec.root_directory.clone(),
            },
        }
    }

    async fn create_and_trigger(
        &self,
        spec: &DeploymentSpec,
        repo_url: &str,
    ) -> Result<(Site, Deploy), DeployerError> {
        let slug = repo_slug(repo_url)?;
        let site: Site = self
            .client
            .post("/sites", &Self::site_request(spec, slug))
            .await
            .map_err(|e| DeployerError::step("Failed to create Netlify site", e))?;
        info!("Created Netlify site {} ({})", spec.name, site.id);

        if !spec.env_vars.is_empty() {
            self.set_environment_variables(&site.id, spec).await;
        }

        let path = format!("/sites/{}/deploys", site.id);
        let deploy: Deploy = self
            .client
            .post_empty(&path)
            .await
            .map_err(|e| DeployerError::step("Failed to trigger Netlify deployment", e))?;

        Ok((site, deploy))
    }

    async fn set_environment_variables(&self, site_id: &str, spec: &DeploymentSpec) {
        let path = format!("/sites/{}", site_id);

        // build_settings.env replaces the whole map, so each call carries
        // every variable set so far
        let mut env = HashMap::new();
        for (key, value) in sorted_env_vars(spec) {
            env.insert(key.clone(), value.clone());
            let body = UpdateSiteEnvRequest {
                build_settings: BuildSettings { env: env.clone() },
            };
            if let Err(e) = self.client.patch::<Value, _>(&path, &body).await {
                warn!("Failed to set Netlify env var {}: {}", key, e);
                env.remove(key);
            }
        }
    }
}

#[async_trait]
impl HostingProvider for NetlifyProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Netlify
    }

    async fn deploy(&self, spec: &DeploymentSpec, repo_url: &str) -> DeploymentResult {
        if let Err(e) = spec.validate() {
            return DeploymentResult::failed(self.kind().as_str(), e.to_string());
        }

        let (site, deploy) = match self.create_and_trigger(spec, repo_url).await {
            Ok(created) => created,
            Err(e) => {
                error!("Netlify deployment failed: {}", e);
                return DeploymentResult::failed(self.kind().as_str(), e.to_string());
            }
        };

        attach_domains(self, &site.id, &spec.custom_domains).await;

        let url = site.public_url().unwrap_or_default().to_string();
        DeploymentResult::success(self.kind().as_str(), site.id, deploy.id, url)
    }

    async fn get_status(&self, service_id: &str, deployment_id: &str) -> DeploymentStatus {
        let path = format!("/sites/{}/deploys/{}", service_id, deployment_id);
        match self.client.get::<Deploy>(&path).await {
            Ok(deploy) => map_status(deploy.state.as_deref().unwrap_or_default()),
            Err(e) => {
                error!("Failed to get Netlify deployment status: {}", e);
                DeploymentStatus::Failed
            }
        }
    }

    async fn list_deployments(&self, service_id: &str) -> Vec<Value> {
        let path = format!("/sites/{}/deploys", service_id);
        match self.client.get::<Vec<Value>>(&path).await {
            Ok(deploys) => deploys,
            Err(e) => {
                error!("Failed to list Netlify deployments: {}", e);
                Vec::new()
            }
        }
    }

    async fn add_custom_domain(
        &self,
        service_id: &str,
        domain: &str,
    ) -> Result<Value, DeployerError> {
        let path = format!("/sites/{}/custom_domains", service_id);
        let body = CustomDomainRequest {
            domain: domain.to_string(),
        };
        self.client.post(&path, &body).await
    }

    async fn test_connection(&self) -> bool {
        match self.client.get::<Value>("/user").await {
            Ok(_) => true,
            Err(e) => {
                error!("Netlify connection test failed: {}", e);
                false
            }
        }
    }
}

/// Map a Netlify deploy state onto the shared vocabulary
pub fn map_status(native: &str) -> DeploymentStatus {
    match native {
        "new" | "pending" | "enqueued" => DeploymentStatus::Pending,
        "building" | "uploading" | "uploaded" | "preparing" | "prepared" | "processing"
        | "processed" => DeploymentStatus::Building,
        "deploying" => DeploymentStatus::Deploying,
        "ready" => DeploymentStatus::Success,
        "error" => DeploymentStatus::Failed,
        "canceled" | "cancelled" => DeploymentStatus::Cancelled,
        _ => DeploymentStatus::Failed,
    }
}
