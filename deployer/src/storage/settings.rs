//! Settings file management

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::deploy::watcher::WaitOptions;
use crate::errors::DeployerError;
use crate::filesys::file::File;
use crate::logs::LogLevel;
use crate::providers::{ProviderKind, ProviderOptions};

pub const DEFAULT_SETTINGS_FILE: &str = "deployer.json";

/// Deployer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON log lines
    #[serde(default)]
    pub log_json: bool,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Per-request timeout for provider APIs
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Provider credentials keyed by provider name
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderSettings>,

    #[serde(default)]
    pub watch: WatchSettings,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_json: false,
            log_dir: None,
            request_timeout_secs: default_request_timeout(),
            providers: BTreeMap::new(),
            watch: WatchSettings::default(),
        }
    }
}

/// Credentials and endpoint overrides for one provider
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub api_key: Option<String>,

    /// Vercel team scope
    #[serde(default)]
    pub team_id: Option<String>,

    /// Override the provider's API endpoint
    #[serde(default)]
    pub base_url: Option<String>,
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("team_id", &self.team_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Status polling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchSettings {
    #[serde(default = "default_watch_interval")]
    pub interval_secs: u64,

    #[serde(default = "default_watch_timeout")]
    pub timeout_secs: u64,
}

fn default_watch_interval() -> u64 {
    10
}

fn default_watch_timeout() -> u64 {
    600
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_watch_interval(),
            timeout_secs: default_watch_timeout(),
        }
    }
}

impl WatchSettings {
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            interval: Duration::from_secs(self.interval_secs.max(1)),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// A provider ready to be added to the orchestrator
pub struct ProviderConfig {
    pub name: String,
    pub api_key: SecretString,
    pub options: ProviderOptions,
}

impl Settings {
    /// Load settings, falling back to defaults when the file does not exist
    pub async fn load(file: &File) -> Result<Self, DeployerError> {
        if !file.exists().await {
            return Ok(Self::default());
        }
        file.read_json::<Settings>().await.map_err(|e| {
            DeployerError::ConfigError(format!(
                "unable to read {}: {}",
                file.path().display(),
                e
            ))
        })
    }

    /// Name of the environment variable holding a provider's API key
    pub fn env_key_name(kind: ProviderKind) -> String {
        format!("DEPLOYER_{}_API_KEY", kind.as_str().to_uppercase())
    }

    /// Fill in missing API keys from `DEPLOYER_<PROVIDER>_API_KEY`
    pub fn with_env_keys<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for kind in ProviderKind::ALL {
            let entry = self.providers.entry(kind.as_str().to_string()).or_default();
            let has_key = entry.api_key.as_deref().is_some_and(|k| !k.trim().is_empty());
            if !has_key {
                entry.api_key = lookup(&Self::env_key_name(kind)).filter(|k| !k.trim().is_empty());
            }
        }
        self.providers.retain(|_, p| p.api_key.is_some());
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Providers with an API key, in name order
    pub fn provider_configs(&self) -> Vec<ProviderConfig> {
        self.providers
            .iter()
            .filter_map(|(name, provider)| {
                let api_key = provider.api_key.as_deref().filter(|k| !k.trim().is_empty())?;
                let mut options = ProviderOptions::default().with_timeout(self.request_timeout());
                if let Some(team_id) = &provider.team_id {
                    options = options.with_team_id(team_id.as_str());
                }
                if let Some(base_url) = &provider.base_url {
                    options = options.with_base_url(base_url.as_str());
                }
                Some(ProviderConfig {
                    name: name.clone(),
                    api_key: SecretString::from(api_key.to_string()),
                    options,
                })
            })
            .collect()
    }
}
