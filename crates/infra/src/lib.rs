//! # SpaceTraders Infrastructure
//!
//! Everything that talks to the outside world.
//!
//! This crate contains:
//! - The request pipeline (HTTP execution and response classification)
//! - The API client with rate-limit retry and authentication
//! - The lossy event bus and the flight-plan tracker
//! - The [`SpaceTrader`] facade exposing every game operation
//! - Configuration loading and tracing bootstrap
//!
//! ## Architecture
//! - Game records and errors come from `spacetraders-domain`
//! - Cache, queue and retry primitives come from `spacetraders-common`

pub mod api;
pub mod config;
pub mod errors;
pub mod events;
pub mod http;
pub mod observability;
pub mod space_trader;
pub mod tracker;

// Re-export commonly used items
pub use api::{ApiClient, RateLimitPolicy};
pub use errors::InfraError;
pub use events::{EventBus, EventStream};
pub use http::{HttpClient, RequestSpec};
pub use space_trader::SpaceTrader;
pub use tracker::{FlightPlanSource, FlightPlanTracker, TrackedOperation};
