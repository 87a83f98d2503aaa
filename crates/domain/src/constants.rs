//! Client constants
//!
//! Centralized defaults used to build [`crate::ClientConfig`].

// Remote service
pub const DEFAULT_BASE_URL: &str = "https://api.spacetraders.io/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

// Rate-limit retry (1s, 2.5s, 6.25s, 15.625s)
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 4;
pub const DEFAULT_RETRY_INITIAL_WAIT_MS: u64 = 1_000;
pub const DEFAULT_RETRY_MAX_WAIT_MS: u64 = 40_000;
pub const DEFAULT_RETRY_MULTIPLIER: f64 = 2.5;

// Read-through cache
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

// Event bus
pub const DEFAULT_EVENT_CAPACITY: usize = 100;
pub const DEFAULT_EVENT_DISCARD_BATCH: usize = 20;

// Flight-plan tracker
pub const DEFAULT_TRACKER_POLL_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_TRACKER_JOIN_TIMEOUT_SECS: u64 = 5;

// Event names
pub const EVENT_FLIGHT_PLAN: &str = "FLIGHT_PLAN";
pub const EVENT_LOAN: &str = "LOAN";
pub const EVENT_SHIP_ORDER: &str = "SHIP_ORDER";
pub const EVENT_SHIP_PURCHASED: &str = "SHIP_PURCHASED";
pub const EVENT_USER_REGISTERED: &str = "USER_REGISTERED";
pub const EVENT_USER_SWITCHED: &str = "USER_SWITCHED";
