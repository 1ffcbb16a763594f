//! Deployment orchestration

pub mod history;
pub mod orchestrator;
pub mod watcher;
