//! Bounded-concurrency, retrying executor for remote calls.
//!
//! Every network round-trip in an ingestion call funnels through one
//! [`CallGovernor`], which caps the number of simultaneous in-flight
//! requests and retries failed operations with increasing backoff.

use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::warn;

/// Default number of simultaneous in-flight remote calls.
pub const DEFAULT_MAX_CONCURRENCY: usize = 2;

/// Default number of retry attempts after the initial failure.
pub const DEFAULT_MAX_RETRIES: usize = 2;

/// Delay before the first retry; doubles on each subsequent attempt.
const BASE_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Executes remote operations under a concurrency cap and a retry budget.
///
/// A fresh governor is created per top-level ingestion call; no concurrency
/// budget is shared across calls. Failures are retried uniformly regardless
/// of cause, network faults and non-success upstream statuses alike, and
/// the failure from the last attempt propagates to the caller unmodified.
pub struct CallGovernor {
    permits: Arc<Semaphore>,
    max_retries: usize,
    base_delay: Duration,
}

impl CallGovernor {
    /// Create a governor with the given concurrency cap and retry budget.
    pub fn new(max_concurrency: usize, max_retries: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
            max_retries,
            base_delay: BASE_RETRY_DELAY,
        }
    }

    /// Override the backoff base delay.
    #[allow(dead_code)] // Tests shorten the backoff to keep them fast
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Run `operation`, waiting for a free slot first.
    ///
    /// The operation is invoked again after each failure until it succeeds
    /// or the retry budget is exhausted. The slot is held for the whole
    /// retry sequence so backoff time still counts against the cap.
    pub async fn execute<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .context("call governor semaphore closed")?;

        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.base_delay * 2u32.saturating_pow(attempt as u32 - 1);
                    warn!(
                        "Remote call failed (attempt {}/{}), retrying in {:?}: {}",
                        attempt,
                        self.max_retries + 1,
                        delay,
                        error
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
