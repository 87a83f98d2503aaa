//! Resilience patterns for talking to a rate-limited remote service
//!
//! - **Retry Logic**: bounded multiplicative backoff driven by a
//!   [`RetryPolicy`] that decides which errors are worth another attempt
//! - **Clock**: time abstraction used by time-aware components such as
//!   [`crate::cache::TtlCache`]

pub mod clock;
pub mod retry;

pub use clock::{Clock, MockClock, SystemClock};
pub use retry::{
    policies, RetryConfig, RetryConfigBuilder, RetryDecision, RetryError, RetryExecutor,
    RetryOutcome, RetryPolicy, RetryResult,
};
