//! GraphQL envelope models

use serde::{Deserialize, Serialize};

/// A GraphQL request document
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<V> {
    pub query: &'static str,
    pub variables: V,
}

impl<V> GraphQlRequest<V> {
    pub fn new(query: &'static str, variables: V) -> Self {
        Self { query, variables }
    }
}

/// A GraphQL response envelope
///
/// Servers answer HTTP 200 even when the operation failed, so `errors`
/// must be inspected before `data` is trusted.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,

    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// A single GraphQL error entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// Join all error messages into one line
    pub fn error_message(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
