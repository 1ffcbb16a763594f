//! GraphQL transport on top of the HTTP client

use hosting_api::{GraphQlRequest, GraphQlResponse};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::errors::DeployerError;
use crate::http::client::HttpClient;

impl HttpClient {
    /// Run a GraphQL operation against the client's base URL
    ///
    /// A response carrying `errors` fails even when the HTTP status was 200.
    pub async fn graphql<V: Serialize, T: DeserializeOwned>(
        &self,
        query: &'static str,
        variables: V,
    ) -> Result<T, DeployerError> {
        let request = GraphQlRequest::new(query, variables);
        let response: GraphQlResponse<T> = self.post("", &request).await?;

        if let Some(message) = response.error_message() {
            warn!("GraphQL operation returned errors: {}", message);
            return Err(DeployerError::GraphQl(message));
        }

        response
            .data
            .ok_or_else(|| DeployerError::InvalidResponse("GraphQL response has no data".to_string()))
    }
}
