//! Configuration loader
//!
//! Loads the client configuration from environment variables or files.
//! Credentials are never read here; sessions are created by the caller.
//!
//! ## Loading Strategy
//! 1. A `.env` file in the working directory (if any) is merged into the
//!    process environment
//! 2. If `SPACETRADERS_BASE_URL` is set, configuration comes from the
//!    environment
//! 3. Otherwise the loader probes for a config file (JSON or TOML)
//! 4. With no file either, built-in defaults are used
//!
//! ## Environment Variables
//! - `SPACETRADERS_BASE_URL`: API base URL (required for env loading)
//! - `SPACETRADERS_TIMEOUT_MS`: Overall request timeout in milliseconds
//! - `SPACETRADERS_STRICT_DECODING`: Reject unknown payload keys (true/false)
//! - `SPACETRADERS_AUTH_SCHEME`: `bearer` or `query_token`
//! - `SPACETRADERS_CACHE_TTL_SECS`: Read-through cache TTL in seconds
//! - `SPACETRADERS_RETRY_ATTEMPTS`: Rate-limit retries after the first call
//!
//! ## File Locations
//! `spacetraders.{json,toml}` then `config.{json,toml}`, first in the current
//! working directory, then in its parent and grandparent.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use spacetraders_domain::{AuthScheme, ClientConfig, Result, SpaceTradersError};

const BASE_URL_VAR: &str = "SPACETRADERS_BASE_URL";

const CONFIG_FILE_NAMES: [&str; 4] =
    ["spacetraders.json", "spacetraders.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy.
///
/// The environment is used when `SPACETRADERS_BASE_URL` is set; otherwise
/// the first config file found by [`probe_config_paths`], otherwise the
/// defaults.
///
/// # Errors
/// Returns `SpaceTradersError::Config` if a present source is malformed or
/// the resulting configuration does not validate.
pub fn load() -> Result<ClientConfig> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            tracing::warn!(error = %err, "ignoring unreadable .env file");
        }
    }

    if std::env::var_os(BASE_URL_VAR).is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }
    tracing::debug!("{BASE_URL_VAR} not set, trying file");

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("No configuration found, using defaults");
            Ok(ClientConfig::default())
        }
    }
}

/// Load configuration from environment variables.
///
/// `SPACETRADERS_BASE_URL` is required; every other variable is optional and
/// falls back to its default.
///
/// # Errors
/// Returns `SpaceTradersError::Config` if the base URL is missing or a
/// variable has an invalid value.
pub fn load_from_env() -> Result<ClientConfig> {
    let mut config = ClientConfig::new(env_var(BASE_URL_VAR)?);

    if let Some(ms) = env_parse::<u64>("SPACETRADERS_TIMEOUT_MS")? {
        config.timeout = Duration::from_millis(ms);
    }
    config.strict_decoding = env_bool("SPACETRADERS_STRICT_DECODING", false);
    if let Ok(scheme) = std::env::var("SPACETRADERS_AUTH_SCHEME") {
        config.auth = AuthScheme::from_str(&scheme)?;
    }
    if let Some(secs) = env_parse::<u64>("SPACETRADERS_CACHE_TTL_SECS")? {
        config.cache.ttl = Duration::from_secs(secs);
    }
    if let Some(attempts) = env_parse::<u32>("SPACETRADERS_RETRY_ATTEMPTS")? {
        config.retry.attempts = attempts;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file.
///
/// If `path` is `None`, probes the standard locations. Format is detected by
/// file extension.
///
/// # Errors
/// Returns `SpaceTradersError::Config` if the file is missing, cannot be
/// parsed or describes an invalid configuration.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SpaceTradersError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SpaceTradersError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SpaceTradersError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SpaceTradersError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SpaceTradersError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(SpaceTradersError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    probe_from(&cwd)
}

fn probe_from(dir: &Path) -> Option<PathBuf> {
    [dir.to_path_buf(), dir.join(".."), dir.join("../..")]
        .iter()
        .flat_map(|base| CONFIG_FILE_NAMES.iter().map(move |name| base.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        SpaceTradersError::Config(format!("Missing required environment variable: {key}"))
    })
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| SpaceTradersError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off`
/// (case-insensitive).
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
