//! HTTP transport for provider APIs

pub mod client;
pub mod graphql;
