//! HTTP client implementation

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::errors::DeployerError;

/// Default timeout applied to every provider request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client bound to one provider API and one bearer token
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(
        base_url: &str,
        token: SecretString,
        timeout: Duration,
    ) -> Result<Self, DeployerError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DeployerError> {
        let request = self.request(Method::GET, path);
        self.send(request).await
    }

    /// Make a POST request with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DeployerError> {
        let request = self.request(Method::POST, path).json(body);
        self.send(request).await
    }

    /// Make a POST request without a body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, DeployerError> {
        let request = self.request(Method::POST, path);
        self.send(request).await
    }

    /// Make a PATCH request with a JSON body
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DeployerError> {
        let request = self.request(Method::PATCH, path).json(body);
        self.send(request).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        self.client
            .request(method, &url)
            .bearer_auth(self.token.expose_secret())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, DeployerError> {
        let response = request.send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let url = response.url().clone();
            let body = response.text().await.unwrap_or_default();
            error!("HTTP request to {} failed: {} - {}", url, status, body);
            return Err(DeployerError::Api {
                status: status.as_u16(),
                body,
            });
        }

        // Some endpoints answer 2xx with an empty body
        let text = response.text().await.map_err(transport_error)?;
        let body = if text.trim().is_empty() {
            serde_json::from_str("null")?
        } else {
            serde_json::from_str(&text)?
        };
        Ok(body)
    }
}

fn transport_error(err: reqwest::Error) -> DeployerError {
    if err.is_timeout() {
        DeployerError::Timeout(err.to_string())
    } else {
        DeployerError::HttpError(err)
    }
}
