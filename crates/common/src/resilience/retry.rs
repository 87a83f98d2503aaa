//! Bounded multiplicative backoff
//!
//! [`RetryExecutor`] re-runs an async operation while its [`RetryPolicy`]
//! says the failure is transient. Each retry sleeps for the current wait and
//! then multiplies the wait for the next round. Retrying stops when either
//! the retry budget is spent or the next wait would exceed `max_delay`,
//! whichever comes first; the last error is handed back to the caller.
//!
//! With the defaults (4 retries, 1 s initial wait, ×2.5, 40 s ceiling) the
//! worst case is five calls separated by 1 s, 2.5 s, 6.25 s and 15.625 s.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors that can occur during retry operations
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The policy still wanted to retry but the budget or the wait ceiling
    /// was reached.
    #[error("retries exhausted after {attempts} attempts: {source:?}")]
    Exhausted { attempts: u32, source: E },

    /// The policy declined to retry this error.
    #[error("operation failed with non-retryable error: {source:?}")]
    NonRetryable { source: E },

    #[error("invalid retry configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl<E> RetryError<E> {
    /// The error returned by the last attempt, if any attempt ran.
    pub fn into_source(self) -> Option<E> {
        match self {
            Self::Exhausted { source, .. } | Self::NonRetryable { source } => Some(source),
            Self::InvalidConfiguration { .. } => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

/// Result type for retry operations
pub type RetryResult<T, E> = Result<T, RetryError<E>>;

/// Outcome of a retry execution including result and summary statistics.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: RetryResult<T, E>,
    /// Calls made, including the first one.
    pub attempts: u32,
    /// Sum of every backoff sleep.
    pub total_delay: Duration,
    pub last_error: Option<String>,
}

impl<T, E> RetryOutcome<T, E> {
    pub fn into_result(self) -> RetryResult<T, E> {
        self.result
    }

    /// Retries performed after the first call.
    pub fn retries(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }
}

/// Trait for determining whether an error should be retried
pub trait RetryPolicy<E> {
    fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision;
}

/// Decision for whether to retry an operation
#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision {
    /// Retry after the current backoff wait
    Retry,
    /// Retry after this wait instead of the current backoff wait
    RetryAfter(Duration),
    Stop,
}

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries allowed after the first call
    pub max_retries: u32,
    /// Wait before the first retry
    pub initial_delay: Duration,
    /// Retrying stops once the next wait would exceed this
    pub max_delay: Duration,
    /// Factor applied to the wait after every retry
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 4,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(40),
            multiplier: 2.5,
        }
    }
}

impl RetryConfig {
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::new()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), RetryError<()>> {
        if self.multiplier.is_nan() || self.multiplier < 1.0 {
            return Err(RetryError::InvalidConfiguration {
                message: "multiplier must be at least 1".to_string(),
            });
        }
        if self.initial_delay > self.max_delay {
            return Err(RetryError::InvalidConfiguration {
                message: "initial_delay cannot exceed max_delay".to_string(),
            });
        }
        Ok(())
    }

    /// Wait schedule the executor would follow if every attempt failed.
    pub fn schedule(&self) -> Vec<Duration> {
        let mut waits = Vec::new();
        let mut wait = self.initial_delay;
        for _ in 0..self.max_retries {
            if wait > self.max_delay {
                break;
            }
            waits.push(wait);
            wait = self.next_delay(wait);
        }
        waits
    }

    fn next_delay(&self, wait: Duration) -> Duration {
        Duration::try_from_secs_f64(wait.as_secs_f64() * self.multiplier).unwrap_or(Duration::MAX)
    }
}

/// Builder for RetryConfig with fluent API
#[derive(Debug, Default)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl RetryConfigBuilder {
    pub fn new() -> Self {
        Self { config: RetryConfig::default() }
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.config.initial_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.config.max_delay = delay;
        self
    }

    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.config.multiplier = multiplier;
        self
    }

    pub fn build(self) -> Result<RetryConfig, RetryError<()>> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// The main retry executor
#[derive(Debug, Clone)]
pub struct RetryExecutor<P> {
    config: RetryConfig,
    policy: P,
}

impl<P> RetryExecutor<P> {
    pub fn new(config: RetryConfig, policy: P) -> Self {
        Self { config, policy }
    }

    pub fn with_policy(policy: P) -> Self {
        Self::new(RetryConfig::default(), policy)
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute an operation with retry logic
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> RetryResult<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute_with_outcome(operation).await.into_result()
    }

    /// Execute an operation with retry logic and return outcome statistics.
    #[instrument(skip(self, operation), fields(max_retries = self.config.max_retries))]
    pub async fn execute_with_outcome<F, Fut, T, E>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut retries_left = self.config.max_retries;
        let mut wait = self.config.initial_delay;
        let mut attempts = 0u32;
        let mut total_delay = Duration::ZERO;

        loop {
            attempts += 1;
            let error = match operation().await {
                Ok(value) => {
                    if attempts > 1 {
                        debug!(retries = attempts - 1, "operation succeeded after retrying");
                    }
                    return RetryOutcome { result: Ok(value), attempts, total_delay, last_error: None };
                }
                Err(error) => error,
            };
            let last_error = Some(format!("{error:?}"));

            let delay = match self.policy.should_retry(&error, attempts - 1) {
                RetryDecision::Stop => {
                    return RetryOutcome {
                        result: Err(RetryError::NonRetryable { source: error }),
                        attempts,
                        total_delay,
                        last_error,
                    };
                }
                RetryDecision::Retry => wait,
                RetryDecision::RetryAfter(custom) => custom,
            };

            if retries_left == 0 || delay > self.config.max_delay {
                warn!(attempts, ?total_delay, error = ?error, "giving up after retries");
                return RetryOutcome {
                    result: Err(RetryError::Exhausted { attempts, source: error }),
                    attempts,
                    total_delay,
                    last_error,
                };
            }

            warn!(attempt = attempts, ?delay, "operation failed, backing off");
            tokio::time::sleep(delay).await;
            total_delay += delay;
            wait = self.config.next_delay(wait);
            retries_left -= 1;
        }
    }
}

/// Pre-defined retry policies
pub mod policies {
    use super::{RetryDecision, RetryPolicy};

    #[derive(Debug, Clone, Copy, Default)]
    pub struct AlwaysRetry;

    impl<E> RetryPolicy<E> for AlwaysRetry {
        fn should_retry(&self, _error: &E, _attempt: u32) -> RetryDecision {
            RetryDecision::Retry
        }
    }

    #[derive(Debug, Clone, Copy, Default)]
    pub struct NeverRetry;

    impl<E> RetryPolicy<E> for NeverRetry {
        fn should_retry(&self, _error: &E, _attempt: u32) -> RetryDecision {
            RetryDecision::Stop
        }
    }

    /// Retries whenever the predicate returns true.
    #[derive(Debug, Clone)]
    pub struct PredicateRetry<F> {
        predicate: F,
    }

    impl<F> PredicateRetry<F> {
        pub fn new(predicate: F) -> Self {
            Self { predicate }
        }
    }

    impl<F, E> RetryPolicy<E> for PredicateRetry<F>
    where
        F: Fn(&E) -> bool,
    {
        fn should_retry(&self, error: &E, _attempt: u32) -> RetryDecision {
            if (self.predicate)(error) {
                RetryDecision::Retry
            } else {
                RetryDecision::Stop
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::policies::*;
    use super::*;

    #[test]
    fn test_default_schedule() {
        let schedule = RetryConfig::default().schedule();
        assert_eq!(
            schedule,
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2500),
                Duration::from_millis(6250),
                Duration::from_millis(15625),
            ]
        );
    }

    #[test]
    fn test_schedule_stops_at_ceiling() {
        let config = RetryConfig::builder().max_retries(10).build().unwrap();
        // 1, 2.5, 6.25, 15.625, 39.0625; the next (97.65625) exceeds 40
        assert_eq!(config.schedule().len(), 5);
    }

    #[test]
    fn test_builder_rejects_invalid_values() {
        assert!(RetryConfig::builder().multiplier(0.5).build().is_err());
        assert!(RetryConfig::builder()
            .initial_delay(Duration::from_secs(50))
            .max_delay(Duration::from_secs(40))
            .build()
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt() {
        let executor = RetryExecutor::with_policy(AlwaysRetry);
        let outcome = executor.execute_with_outcome(|| async { Ok::<_, ()>(7) }).await;
        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.total_delay, Duration::ZERO);
        assert_eq!(outcome.into_result().unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_stops_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let executor = RetryExecutor::with_policy(NeverRetry);
        let counter = calls.clone();
        let result = executor
            .execute(|| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>("bad request") }
            })
            .await;
        assert!(matches!(result, Err(RetryError::NonRetryable { source: "bad request" })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_overrides_wait() {
        struct Fixed;
        impl RetryPolicy<&'static str> for Fixed {
            fn should_retry(&self, _: &&'static str, _: u32) -> RetryDecision {
                RetryDecision::RetryAfter(Duration::from_millis(10))
            }
        }

        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let outcome = RetryExecutor::with_policy(Fixed)
            .execute_with_outcome(|| {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err("busy")
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.total_delay, Duration::from_millis(20));
    }
}
