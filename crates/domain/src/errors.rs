//! Error types used throughout the client

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error record reported by the remote API (or synthesized for rate limits).
///
/// Rendered as `"[404] error - User x does not exist!"`: the numeric prefix is
/// omitted when `code` is zero and the detail when `message` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Short error label (`"error"` for remote envelopes).
    #[serde(rename = "error")]
    pub kind: String,
    /// Human readable detail.
    pub message: String,
    /// Numeric code; HTTP status or remote error code.
    pub code: u32,
}

impl ApiError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>, code: u32) -> Self {
        Self { kind: kind.into(), message: message.into(), code }
    }

    /// The error synthesized for an HTTP 429 response.
    pub fn rate_limited() -> Self {
        Self::new("Rate Limit Exceeded", "Too Many Requests", 429)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code != 0 {
            write!(f, "[{:3}] ", self.code)?;
        }
        f.write_str(&self.kind)?;
        if !self.message.is_empty() {
            write!(f, " - {}", self.message)?;
        }
        Ok(())
    }
}

/// Coarse classification of [`SpaceTradersError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    RateLimited,
    Domain,
    Decode,
    Validation,
    Config,
}

/// Main error type for SpaceTraders client operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpaceTradersError {
    /// Network or I/O failure (DNS, timeout, connection reset).
    #[error("Transport error: {0}")]
    Transport(String),

    /// HTTP 429, still present after the retry budget was spent.
    #[error("{0}")]
    RateLimited(ApiError),

    /// Business error reported by the remote service.
    #[error("{0}")]
    Domain(ApiError),

    /// Payload did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Caller-supplied argument rejected before any network call.
    #[error("Invalid argument: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SpaceTradersError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::RateLimited(_) => ErrorKind::RateLimited,
            Self::Domain(_) => ErrorKind::Domain,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    /// Only rate limits are retried by the client itself.
    pub fn is_retryable(&self) -> bool {
        self.is_rate_limited()
    }

    /// The remote error record, for rate-limit and domain errors.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::RateLimited(err) | Self::Domain(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for SpaceTraders operations
pub type Result<T> = std::result::Result<T, SpaceTradersError>;
