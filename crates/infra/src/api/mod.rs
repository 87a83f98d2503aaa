//! Authenticated access to the remote game API

pub mod client;
pub mod responses;

pub use client::{retry_config, ApiClient, RateLimitPolicy};
