//! Wire models for the hosting provider APIs used by the deployer.

pub mod models;

pub use models::graphql::{GraphQlError, GraphQlRequest, GraphQlResponse};
