use log::{debug, warn};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use super::error::AuthorityError;
use crate::config::EnrichmentConfig;

/// Bounded retry budget for one authority call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(600),
            attempt_timeout: Duration::from_secs(14),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &EnrichmentConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.base_delay(),
            attempt_timeout: config.attempt_timeout(),
        }
    }

    /// Delay after failed attempt `attempt` (1-based): base * 2^(attempt-1)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

/// Progress of one authority call through its retry budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    NotAttempted,
    Attempting(u32),
    /// The authority answered
    Accepted,
    /// Budget spent or a fatal error
    Exhausted,
}

impl AttemptState {
    /// Number of the next attempt, if the budget allows one
    pub fn next_attempt(&self, max_attempts: u32) -> Option<u32> {
        match *self {
            AttemptState::NotAttempted if max_attempts > 0 => Some(1),
            AttemptState::Attempting(n) if n < max_attempts => Some(n + 1),
            _ => None,
        }
    }
}

/// Final state of a retried call together with its result
#[derive(Debug)]
pub struct RetryOutcome<T> {
    pub state: AttemptState,
    pub attempts: u32,
    pub result: Result<T, AuthorityError>,
}

/// Run `call` until it succeeds, fails fatally or the policy is spent.
/// Each attempt is bounded by the policy timeout.
pub async fn call_with_retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut call: F) -> RetryOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AuthorityError>>,
{
    let mut state = AttemptState::NotAttempted;
    let mut attempts = 0;
    let mut last_error = AuthorityError::Timeout;

    while let Some(attempt) = state.next_attempt(policy.max_attempts) {
        state = AttemptState::Attempting(attempt);
        attempts = attempt;

        let result = match timeout(policy.attempt_timeout, call()).await {
            Ok(result) => result,
            Err(_) => Err(AuthorityError::Timeout),
        };

        match result {
            Ok(value) => {
                debug!("{} answered on attempt {}", label, attempt);
                return RetryOutcome {
                    state: AttemptState::Accepted,
                    attempts,
                    result: Ok(value),
                };
            }
            Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                let delay = policy.backoff(attempt);
                warn!(
                    "{} failed: {}, retrying ({}/{}) in {}ms",
                    label,
                    e,
                    attempt,
                    policy.max_attempts,
                    delay.as_millis()
                );
                sleep(delay).await;
                last_error = e;
            }
            Err(e) => {
                warn!("{} failed after {} attempt(s): {}", label, attempt, e);
                last_error = e;
                break;
            }
        }
    }

    RetryOutcome {
        state: AttemptState::Exhausted,
        attempts,
        result: Err(last_error),
    }
}
