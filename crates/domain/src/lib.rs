//! # SpaceTraders Domain
//!
//! Game records and value types shared by the SpaceTraders client crates.
//!
//! This crate contains:
//! - Game records (accounts, ships, loans, flight plans, locations, markets)
//! - The closed set of client events
//! - The immutable session context used to authenticate calls
//! - The client error taxonomy and Result alias
//! - Client configuration structures
//!
//! ## Architecture
//! - No dependencies on other SpaceTraders crates
//! - No I/O; only plain data and validation

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod session;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use events::*;
pub use session::Session;
pub use types::*;
