//! In-memory deployment history

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::deploy::orchestrator::Orchestrator;
use crate::models::deployment::DeploymentResult;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// One multi-provider deployment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub id: Uuid,
    pub project_name: String,
    pub repo_url: String,

    /// Providers targeted by the run, sorted
    pub providers: Vec<String>,

    pub results: HashMap<String, DeploymentResult>,
    pub created_at: DateTime<Utc>,
}

/// Most recent deployment runs, newest last
pub struct DeploymentHistory {
    records: RwLock<VecDeque<DeploymentRecord>>,
    capacity: usize,
}

impl Default for DeploymentHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl DeploymentHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    /// Store the results of a run, evicting the oldest record when full
    pub fn record(
        &self,
        project_name: &str,
        repo_url: &str,
        results: HashMap<String, DeploymentResult>,
    ) -> DeploymentRecord {
        let mut providers: Vec<String> = results.keys().cloned().collect();
        providers.sort();

        let record = DeploymentRecord {
            id: Uuid::new_v4(),
            project_name: project_name.to_string(),
            repo_url: repo_url.to_string(),
            providers,
            results,
            created_at: Utc::now(),
        };

        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        while records.len() >= self.capacity {
            if let Some(evicted) = records.pop_front() {
                debug!("Evicted deployment record {}", evicted.id);
            }
        }
        records.push_back(record.clone());

        record
    }

    pub fn get(&self, id: &Uuid) -> Option<DeploymentRecord> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        records.iter().find(|r| r.id == *id).cloned()
    }

    /// All records, oldest first
    pub fn list(&self) -> Vec<DeploymentRecord> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-query the status of every result that has provider identifiers
    ///
    /// Providers that are no longer configured keep their last known status.
    pub async fn refresh_statuses(
        &self,
        orchestrator: &Orchestrator,
        id: &Uuid,
    ) -> Option<DeploymentRecord> {
        let mut record = self.get(id)?;

        for (name, result) in record.results.iter_mut() {
            if result.service_id.is_empty() || result.deployment_id.is_empty() {
                continue;
            }
            match orchestrator
                .get_deployment_status(name, &result.service_id, &result.deployment_id)
                .await
            {
                Ok(status) => *result = result.with_status(status),
                Err(e) => warn!("Could not refresh {} status: {}", name, e),
            }
        }

        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        if let Some(stored) = records.iter_mut().find(|r| r.id == *id) {
            *stored = record.clone();
        }

        Some(record)
    }
}
