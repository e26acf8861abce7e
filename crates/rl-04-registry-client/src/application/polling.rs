//! # Polling Controller
//!
//! Repeats a query with a fixed cursor until the header flags leave the
//! pending state or the poll bound is exceeded.
//!
//! ## Loop
//!
//! 1. Check cancellation
//! 2. Query; a failed query ends the loop with its error
//! 3. Classify the header flags; anything but pending ends the loop
//! 4. If more than `timeout` has passed since the first query: `PollTimeout`
//! 5. Sleep `interval`, racing cancellation

use rl_03_envelope::ResponseEnvelope;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{ClientError, PollDecision, PollPolicy};

/// Final answer of a poll loop.
#[derive(Debug, Clone)]
pub struct PollResult {
    /// The last query answer.
    pub response: ResponseEnvelope,
    /// `Completed` or `Finished`.
    pub decision: PollDecision,
    /// Queries sent.
    pub attempts: u32,
    /// Time from the first query to the last answer.
    pub elapsed: Duration,
}

/// Fixed-interval poll loop.
#[derive(Debug, Clone)]
pub struct PollingController {
    interval: Duration,
    timeout: Duration,
    policy: PollPolicy,
}

impl PollingController {
    /// Controller sleeping `interval` between queries and giving up after
    /// `timeout`.
    pub fn new(interval: Duration, timeout: Duration, policy: PollPolicy) -> Self {
        Self {
            interval,
            timeout,
            policy,
        }
    }

    /// Delay between queries.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Poll bound.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Flag codes driving the loop.
    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Run `query` until its answer is no longer pending.
    ///
    /// `query` receives the 1-based attempt number.
    ///
    /// # Errors
    ///
    /// - `ClientError::Cancelled` if `cancel` fires before a query or
    ///   during a delay
    /// - `ClientError::PollTimeout` once a pending answer arrives after the
    ///   bound has passed
    /// - any error returned by `query`
    pub async fn poll<F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut query: F,
    ) -> Result<PollResult, ClientError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<ResponseEnvelope, ClientError>>,
    {
        let start = Instant::now();
        let mut attempts = 0u32;

        loop {
            if cancel.is_cancelled() {
                return Err(ClientError::Cancelled);
            }

            attempts += 1;
            let response = query(attempts).await?;
            let decision = self.policy.classify(&response.flags);
            let elapsed = start.elapsed();

            if decision != PollDecision::Pending {
                if decision == PollDecision::Finished {
                    warn!(
                        "[rl-04] Poll finished without results: {:?}",
                        response.flag_codes()
                    );
                } else {
                    info!("[rl-04] Results available after {} queries", attempts);
                }
                return Ok(PollResult {
                    response,
                    decision,
                    attempts,
                    elapsed,
                });
            }

            if elapsed > self.timeout {
                warn!(
                    "[rl-04] Still pending after {:?} ({} queries), giving up",
                    elapsed, attempts
                );
                return Err(ClientError::PollTimeout { elapsed, attempts });
            }

            debug!(
                "[rl-04] Query {} pending, next in {:?}",
                attempts, self.interval
            );
            tokio::select! {
                _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}
