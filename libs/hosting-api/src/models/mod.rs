//! API models, one module per provider dialect

pub mod graphql;
pub mod netlify;
pub mod railway;
pub mod render;
pub mod vercel;
