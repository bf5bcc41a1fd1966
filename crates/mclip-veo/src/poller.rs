//! Fixed-interval polling of long-running operations.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::VeoConfig;
use crate::error::{VeoError, VeoResult};
use crate::metrics;
use crate::types::Operation;

/// Anything that can report the current state of an operation.
#[async_trait]
pub trait OperationSource: Send + Sync {
    async fn get_operation(&self, name: &str) -> VeoResult<Operation>;
}

/// Waits for an operation to finish by querying it at a fixed interval.
///
/// There is no retry or backoff: the first failed query aborts the wait.
#[derive(Debug, Clone)]
pub struct JobPoller {
    interval: Duration,
    timeout: Option<Duration>,
}

impl JobPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timeout: None,
        }
    }

    pub fn from_config(config: &VeoConfig) -> Self {
        Self {
            interval: config.poll_interval,
            timeout: config.poll_timeout,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Poll until `done` is set. The interval elapses before every query.
    pub async fn poll_until_done<S>(&self, source: &S, operation: Operation) -> VeoResult<Operation>
    where
        S: OperationSource + ?Sized,
    {
        let started = Instant::now();
        let mut current = operation;
        let mut attempt: u32 = 0;

        while !current.done {
            tokio::time::sleep(self.interval).await;
            attempt += 1;

            if let Some(timeout) = self.timeout {
                if started.elapsed() >= timeout {
                    warn!(operation = %current.name, attempt, "Operation did not finish in time");
                    metrics::record_poll("timeout");
                    return Err(VeoError::PollTimeout(timeout));
                }
            }

            current = match source.get_operation(&current.name).await {
                Ok(next) => next,
                Err(e) => {
                    warn!(operation = %current.name, attempt, error = %e, "Polling failed");
                    metrics::record_poll("error");
                    return Err(VeoError::PollFailed(Box::new(e)));
                }
            };

            metrics::record_poll(if current.done { "done" } else { "pending" });
            debug!(
                operation = %current.name,
                attempt,
                done = current.done,
                elapsed_secs = started.elapsed().as_secs(),
                "Polled operation"
            );
        }

        info!(
            operation = %current.name,
            polls = attempt,
            elapsed_secs = started.elapsed().as_secs(),
            "Operation finished"
        );
        Ok(current)
    }
}
