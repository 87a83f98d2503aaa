//! Client configuration
//!
//! [`ClientConfig`] is built once and handed to the client at construction.
//! Every group has a [`Default`] matching the public SpaceTraders service, so
//! a config file only needs to name the values it overrides.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_CACHE_TTL_SECS, DEFAULT_EVENT_CAPACITY, DEFAULT_EVENT_DISCARD_BATCH,
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_INITIAL_WAIT_MS, DEFAULT_RETRY_MAX_WAIT_MS,
    DEFAULT_RETRY_MULTIPLIER, DEFAULT_TIMEOUT_SECS, DEFAULT_TRACKER_JOIN_TIMEOUT_SECS,
    DEFAULT_TRACKER_POLL_INTERVAL_MS,
};
use crate::errors::{Result, SpaceTradersError};
use crate::utils::duration_millis;

/// How the session token is attached to authenticated requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>` header.
    #[default]
    Bearer,
    /// `?token=<token>` query parameter.
    QueryToken,
}

impl FromStr for AuthScheme {
    type Err = SpaceTradersError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bearer" => Ok(Self::Bearer),
            "query" | "query_token" => Ok(Self::QueryToken),
            other => Err(SpaceTradersError::Config(format!("unknown auth scheme: {other}"))),
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer => f.write_str("bearer"),
            Self::QueryToken => f.write_str("query_token"),
        }
    }
}

/// Backoff applied when the server answers 429.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicyConfig {
    /// Retries after the first call (default: 4).
    pub attempts: u32,
    #[serde(with = "duration_millis")]
    pub initial_wait: Duration,
    /// Retrying stops once the next wait would exceed this.
    #[serde(with = "duration_millis")]
    pub max_wait: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicyConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            initial_wait: Duration::from_millis(DEFAULT_RETRY_INITIAL_WAIT_MS),
            max_wait: Duration::from_millis(DEFAULT_RETRY_MAX_WAIT_MS),
            multiplier: DEFAULT_RETRY_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    #[serde(with = "duration_millis")]
    pub ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventBusConfig {
    pub capacity: usize,
    /// Oldest events dropped at once when the bus is full.
    pub discard_batch: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self { capacity: DEFAULT_EVENT_CAPACITY, discard_batch: DEFAULT_EVENT_DISCARD_BATCH }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    #[serde(with = "duration_millis")]
    pub poll_interval: Duration,
    /// How long `shutdown` waits for the background task.
    #[serde(with = "duration_millis")]
    pub join_timeout: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_TRACKER_POLL_INTERVAL_MS),
            join_timeout: Duration::from_secs(DEFAULT_TRACKER_JOIN_TIMEOUT_SECS),
        }
    }
}

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(with = "duration_millis")]
    pub timeout: Duration,
    pub auth: AuthScheme,
    /// Reject payload keys the target record does not model.
    pub strict_decoding: bool,
    pub retry: RetryPolicyConfig,
    pub cache: CacheSettings,
    pub events: EventBusConfig,
    pub tracker: TrackerConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            auth: AuthScheme::default(),
            strict_decoding: false,
            retry: RetryPolicyConfig::default(),
            cache: CacheSettings::default(),
            events: EventBusConfig::default(),
            tracker: TrackerConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Default configuration pointed at another server.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Default::default() }
    }

    pub fn with_auth(mut self, auth: AuthScheme) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_strict_decoding(mut self, strict: bool) -> Self {
        self.strict_decoding = strict;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicyConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache.ttl = ttl;
        self
    }

    pub fn with_events(mut self, events: EventBusConfig) -> Self {
        self.events = events;
        self
    }

    pub fn with_tracker(mut self, tracker: TrackerConfig) -> Self {
        self.tracker = tracker;
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns [`SpaceTradersError::Config`] naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(SpaceTradersError::Config("base_url cannot be empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(SpaceTradersError::Config("timeout must be greater than 0".to_string()));
        }
        if self.retry.multiplier.is_nan() || self.retry.multiplier <= 1.0 {
            return Err(SpaceTradersError::Config(
                "retry multiplier must be greater than 1".to_string(),
            ));
        }
        if self.retry.initial_wait > self.retry.max_wait {
            return Err(SpaceTradersError::Config(
                "retry initial_wait cannot exceed max_wait".to_string(),
            ));
        }
        if self.events.capacity == 0 {
            return Err(SpaceTradersError::Config(
                "event capacity must be greater than 0".to_string(),
            ));
        }
        if self.events.discard_batch == 0 || self.events.discard_batch >= self.events.capacity {
            return Err(SpaceTradersError::Config(
                "event discard_batch must be between 1 and capacity - 1".to_string(),
            ));
        }
        if self.tracker.poll_interval.is_zero() {
            return Err(SpaceTradersError::Config(
                "tracker poll_interval must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
