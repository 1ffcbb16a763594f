//! Deployment status watcher

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::models::deployment::DeploymentStatus;
use crate::providers::HostingProvider;

/// Shortest delay between two status checks
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Watcher options
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Delay between status checks
    pub interval: Duration,

    /// Give up after this much polling
    pub timeout: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(600),
        }
    }
}

/// How a wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The deployment reached a terminal status
    Finished(DeploymentStatus),

    /// Polling stopped first; carries the last status seen
    TimedOut(DeploymentStatus),
}

impl WaitOutcome {
    pub fn status(&self) -> DeploymentStatus {
        match self {
            WaitOutcome::Finished(status) | WaitOutcome::TimedOut(status) => *status,
        }
    }
}

/// Poll a deployment until it is terminal or the timeout is used up
///
/// Elapsed time is counted in intervals slept, so an injected `sleep_fn`
/// fully controls the clock. Intervals below [`MIN_POLL_INTERVAL`] are
/// raised to it.
pub async fn wait_for_terminal<S, F>(
    provider: &dyn HostingProvider,
    service_id: &str,
    deployment_id: &str,
    options: &WaitOptions,
    sleep_fn: S,
) -> WaitOutcome
where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!(
        "Waiting for {} deployment {} to finish...",
        provider.kind(),
        deployment_id
    );

    let interval = options.interval.max(MIN_POLL_INTERVAL);
    let mut elapsed = Duration::ZERO;
    loop {
        let status = provider.get_status(service_id, deployment_id).await;
        debug!("{} deployment {} is {}", provider.kind(), deployment_id, status);

        if status.is_terminal() {
            info!("{} deployment {} finished: {}", provider.kind(), deployment_id, status);
            return WaitOutcome::Finished(status);
        }

        if elapsed >= options.timeout {
            warn!(
                "Stopped waiting for {} deployment {} after {:?} (last status: {})",
                provider.kind(),
                deployment_id,
                elapsed,
                status
            );
            return WaitOutcome::TimedOut(status);
        }

        sleep_fn(interval).await;
        elapsed += interval;
    }
}
