//! Tracing bootstrap for applications embedding the client.

use tracing_subscriber::EnvFilter;

/// Filter used when no environment override is present.
pub const DEFAULT_FILTER: &str = "info,spacetraders_infra=info,spacetraders_common=warn";

/// Install a global fmt subscriber.
///
/// Filter precedence:
/// 1) `RUST_LOG`
/// 2) `SPACETRADERS_LOG`
/// 3) `default_filter`
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(filter_from_env(default_filter))
        .try_init()
        .is_ok()
}

fn filter_from_env(default_filter: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let custom = std::env::var("SPACETRADERS_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok());
    if let Some(filter) = custom {
        return filter;
    }

    EnvFilter::try_new(default_filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
