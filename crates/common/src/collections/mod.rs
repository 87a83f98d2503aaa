//! Specialized data structures
//!
//! - **[`lossy_queue`]**: Bounded FIFO queue that drops its oldest entries
//!   instead of blocking producers

pub mod lossy_queue;

pub use lossy_queue::LossyQueue;
