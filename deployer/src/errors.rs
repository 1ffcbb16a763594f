//! Error types for the deployer

use thiserror::Error;

/// Main error type for the deployer
#[derive(Error, Debug)]
pub enum DeployerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Provider API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("{step}: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<DeployerError>,
    },

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Provider {0} not configured")]
    ProviderNotConfigured(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeployerError {
    /// Tag an error with the provider call that produced it
    pub fn step(step: &'static str, source: DeployerError) -> Self {
        DeployerError::Step {
            step,
            source: Box::new(source),
        }
    }

    /// Errors raised before any provider call is made
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DeployerError::UnsupportedProvider(_)
                | DeployerError::ProviderNotConfigured(_)
                | DeployerError::Validation(_)
                | DeployerError::ConfigError(_)
        )
    }
}

impl From<anyhow::Error> for DeployerError {
    fn from(err: anyhow::Error) -> Self {
        DeployerError::Internal(err.to_string())
    }
}
