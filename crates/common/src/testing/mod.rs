//! Testing utilities and helpers
//!
//! - **[`async_utils`]**: waiting on background tasks from async tests
//!
//! Clocks for deterministic time live in [`crate::resilience`] and are
//! re-exported here.

pub mod async_utils;

// Note: Macros exported with #[macro_export] are available at crate root
pub use async_utils::{poll_until, timeout_ok};

pub use crate::resilience::{Clock, MockClock, SystemClock};
