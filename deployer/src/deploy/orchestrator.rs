//! Deployment orchestrator

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures::future::join_all;
use secrecy::SecretString;
use serde_json::Value;
use tracing::{error, info};

use crate::deploy::watcher::{self, WaitOptions, WaitOutcome};
use crate::errors::DeployerError;
use crate::models::deployment::{DeploymentResult, DeploymentSpec, DeploymentStatus};
use crate::providers::{HostingProvider, ProviderFactory, ProviderKind, ProviderOptions};

/// Fans one deployment spec out to the configured hosting providers
///
/// The orchestrator owns its registry of adapters. It keeps no deployment
/// state of its own: progress lives at the providers and is only observed
/// through [`Orchestrator::get_deployment_status`].
#[derive(Default)]
pub struct Orchestrator {
    providers: HashMap<String, Arc<dyn HostingProvider>>,
}

impl Orchestrator {
    /// Create an orchestrator with an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure a provider, replacing any previous entry with that name
    pub fn add_provider(
        &mut self,
        name: &str,
        api_key: SecretString,
        options: &ProviderOptions,
    ) -> Result<(), DeployerError> {
        let kind: ProviderKind = name.parse()?;
        let provider = ProviderFactory::create(kind, api_key, options)?;
        self.providers.insert(kind.as_str().to_string(), provider);
        info!("Added provider: {}", kind);
        Ok(())
    }

    /// Register an already built adapter under its own kind
    pub fn register(&mut self, provider: Arc<dyn HostingProvider>) {
        let name = provider.kind().as_str().to_string();
        info!("Registered provider: {}", name);
        self.providers.insert(name, provider);
    }

    /// Drop a provider and its credentials; unknown names are ignored
    pub fn remove_provider(&mut self, name: &str) {
        if self.providers.remove(&registry_key(name)).is_some() {
            info!("Removed provider: {}", name);
        }
    }

    fn provider(&self, name: &str) -> Result<Arc<dyn HostingProvider>, DeployerError> {
        self.providers
            .get(&registry_key(name))
            .cloned()
            .ok_or_else(|| DeployerError::ProviderNotConfigured(name.to_string()))
    }

    /// Deploy to a single configured provider
    ///
    /// Only configuration problems are errors; a failed deployment comes
    /// back as a failed [`DeploymentResult`].
    pub async fn deploy_to_provider(
        &self,
        name: &str,
        spec: &DeploymentSpec,
        repo_url: &str,
    ) -> Result<DeploymentResult, DeployerError> {
        let provider = self.provider(name)?;
        spec.validate()?;

        info!("Deploying {} to {}...", spec.name, name);
        Ok(provider.deploy(spec, repo_url).await)
    }

    /// Deploy to every configured provider
    pub async fn deploy_to_all(
        &self,
        spec: &DeploymentSpec,
        repo_url: &str,
    ) -> Result<HashMap<String, DeploymentResult>, DeployerError> {
        self.deploy_to_providers::<&str>(&[], spec, repo_url).await
    }

    /// Deploy to the named providers, or to all of them when `names` is empty
    ///
    /// Every name is checked before the first provider call. Providers run
    /// concurrently and the returned map holds exactly one entry per target,
    /// even when an adapter panics.
    pub async fn deploy_to_providers<S: AsRef<str>>(
        &self,
        names: &[S],
        spec: &DeploymentSpec,
        repo_url: &str,
    ) -> Result<HashMap<String, DeploymentResult>, DeployerError> {
        let targets = self.resolve_targets(names)?;
        spec.validate()?;

        let spec = Arc::new(spec.clone());
        let repo_url: Arc<str> = Arc::from(repo_url);

        let handles = targets.into_iter().map(|(name, provider)| {
            let spec = Arc::clone(&spec);
            let repo_url = Arc::clone(&repo_url);
            info!("Deploying {} to {}...", spec.name, name);
            let handle = tokio::spawn(async move { provider.deploy(&spec, &repo_url).await });
            async move { (name, handle.await) }
        });

        let mut results = HashMap::new();
        for (name, joined) in join_all(handles).await {
            let result = match joined {
                Ok(result) => {
                    info!("Deployment to {}: {}", name, result.status);
                    result
                }
                Err(e) => {
                    let reason = if e.is_panic() {
                        panic_message(e.into_panic())
                    } else {
                        e.to_string()
                    };
                    error!("Failed to deploy to {}: {}", name, reason);
                    DeploymentResult::failed(name.as_str(), format!("deployment task failed: {reason}"))
                }
            };
            results.insert(name, result);
        }

        Ok(results)
    }

    fn resolve_targets<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<BTreeMap<String, Arc<dyn HostingProvider>>, DeployerError> {
        if names.is_empty() {
            return Ok(self
                .providers
                .iter()
                .map(|(name, provider)| (name.clone(), Arc::clone(provider)))
                .collect());
        }

        let mut targets = BTreeMap::new();
        for name in names {
            let provider = self.provider(name.as_ref())?;
            targets.insert(registry_key(name.as_ref()), provider);
        }
        Ok(targets)
    }

    /// Current status of a deployment at the named provider
    pub async fn get_deployment_status(
        &self,
        name: &str,
        service_id: &str,
        deployment_id: &str,
    ) -> Result<DeploymentStatus, DeployerError> {
        let provider = self.provider(name)?;
        Ok(provider.get_status(service_id, deployment_id).await)
    }

    /// Poll a deployment until it settles or `options.timeout` passes
    ///
    /// Timing out only stops the polling; the remote deployment keeps going.
    pub async fn wait_for_deployment(
        &self,
        name: &str,
        service_id: &str,
        deployment_id: &str,
        options: &WaitOptions,
    ) -> Result<WaitOutcome, DeployerError> {
        let provider = self.provider(name)?;
        Ok(watcher::wait_for_terminal(
            provider.as_ref(),
            service_id,
            deployment_id,
            options,
            tokio::time::sleep,
        )
        .await)
    }

    /// Raw deployment records of a service
    pub async fn list_deployments(
        &self,
        name: &str,
        service_id: &str,
    ) -> Result<Vec<Value>, DeployerError> {
        let provider = self.provider(name)?;
        Ok(provider.list_deployments(service_id).await)
    }

    /// Attach a custom domain to a service at the named provider
    pub async fn add_custom_domain(
        &self,
        name: &str,
        service_id: &str,
        domain: &str,
    ) -> Result<Value, DeployerError> {
        let provider = self.provider(name)?;
        provider.add_custom_domain(service_id, domain).await
    }

    /// Check a provider's credentials; unconfigured providers fail the check
    pub async fn test_provider_connection(&self, name: &str) -> bool {
        match self.provider(name) {
            Ok(provider) => provider.test_connection().await,
            Err(_) => false,
        }
    }

    /// Every provider this build knows how to talk to
    pub fn get_supported_providers(&self) -> Vec<&'static str> {
        ProviderKind::ALL.iter().map(|kind| kind.as_str()).collect()
    }

    /// Names currently in the registry, sorted
    pub fn get_configured_providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }
}

fn registry_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "adapter panicked".to_string()
    }
}
