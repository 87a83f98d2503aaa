//! Generic building blocks shared across SpaceTraders crates.
//!
//! Nothing in this crate knows about the game API; it provides the
//! time-aware cache, the lossy queue behind the event bus, the rate-limit
//! retry executor and a few async test helpers.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: collections
//! - `runtime`: async infrastructure (cache, resilience, testing helpers)
//! - `test-utils`: runtime, for downstream crates using the testing helpers

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod collections;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod cache;
#[cfg(feature = "runtime")]
pub mod resilience;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use cache::{CacheStats, TtlCache};
#[cfg(feature = "foundation")]
pub use collections::LossyQueue;
#[cfg(feature = "runtime")]
pub use resilience::{
    policies, Clock, MockClock, RetryConfig, RetryConfigBuilder, RetryDecision, RetryError,
    RetryExecutor, RetryOutcome, RetryPolicy, RetryResult, SystemClock,
};
