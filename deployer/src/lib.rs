//! Deployer Library
//!
//! Deploys one service description to Render, Vercel, Netlify and Railway
//! through a common provider contract.

pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod providers;
pub mod storage;
pub mod utils;
