//! API client: request pipeline plus rate-limit retry
//!
//! Every request goes through [`ApiClient::send`], which attaches the
//! session credentials, runs the pipeline and retries HTTP 429 responses
//! with multiplicative backoff. All other outcomes are returned unchanged.

use serde::de::DeserializeOwned;
use serde::Serialize;
use spacetraders_common::resilience::{
    RetryConfig, RetryDecision, RetryError, RetryExecutor, RetryPolicy,
};
use spacetraders_domain::{
    AuthScheme, ClientConfig, RetryPolicyConfig, Result, Session, SpaceTradersError,
};
use tracing::{debug, instrument};
use url::Url;

use crate::errors::InfraError;
use crate::http::{HttpClient, RequestSpec};

/// Retries rate-limited responses only.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimitPolicy;

impl RetryPolicy<SpaceTradersError> for RateLimitPolicy {
    fn should_retry(&self, error: &SpaceTradersError, _attempt: u32) -> RetryDecision {
        if error.is_rate_limited() {
            RetryDecision::Retry
        } else {
            RetryDecision::Stop
        }
    }
}

/// Translate the client's retry settings into executor settings.
pub fn retry_config(settings: &RetryPolicyConfig) -> Result<RetryConfig> {
    RetryConfig::builder()
        .max_retries(settings.attempts)
        .initial_delay(settings.initial_wait)
        .max_delay(settings.max_wait)
        .multiplier(settings.multiplier)
        .build()
        .map_err(|err| SpaceTradersError::Config(err.to_string()))
}

/// HTTP client bound to one API base URL and one authentication scheme.
#[derive(Debug)]
pub struct ApiClient {
    http: HttpClient,
    base_url: Url,
    auth: AuthScheme,
    strict: bool,
    retry: RetryExecutor<RateLimitPolicy>,
}

impl ApiClient {
    /// Build a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceTradersError::Config`] when the configuration is
    /// invalid or the HTTP client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = HttpClient::builder()
            .timeout(config.timeout)
            .user_agent(concat!("spacetraders-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: parse_base_url(&config.base_url)?,
            auth: config.auth,
            strict: config.strict_decoding,
            retry: RetryExecutor::new(retry_config(&config.retry)?, RateLimitPolicy),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn auth_scheme(&self) -> AuthScheme {
        self.auth
    }

    pub fn strict_decoding(&self) -> bool {
        self.strict
    }

    pub fn retry_config(&self) -> &RetryConfig {
        self.retry.config()
    }

    /// Send `spec` and decode the reply into `T`, retrying rate limits.
    ///
    /// When `session` is given its token is attached according to the
    /// configured [`AuthScheme`].
    #[instrument(skip(self, spec, session), fields(method = %spec.method, path = %spec.path()))]
    pub async fn send<T>(&self, spec: RequestSpec, session: Option<&Session>) -> Result<T>
    where
        T: DeserializeOwned + Serialize,
    {
        let spec = self.authorize(spec, session);
        let outcome = self.retry.execute_with_outcome(|| self.send_once::<T>(&spec)).await;
        if outcome.retries() > 0 {
            debug!(retries = outcome.retries(), waited = ?outcome.total_delay, "rate limit backoff");
        }
        outcome.into_result().map_err(from_retry_error)
    }

    /// One pass through the pipeline without retries.
    pub async fn send_once<T>(&self, spec: &RequestSpec) -> Result<T>
    where
        T: DeserializeOwned + Serialize,
    {
        let response = self.http.execute(&self.base_url, spec).await?;
        response.into_shape(self.strict)
    }

    fn authorize(&self, spec: RequestSpec, session: Option<&Session>) -> RequestSpec {
        let Some(session) = session else {
            return spec;
        };
        match self.auth {
            AuthScheme::Bearer => {
                spec.header("Authorization", format!("Bearer {}", session.token()))
            }
            AuthScheme::QueryToken => spec.query("token", session.token()),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Ok(Url::parse(&raw).map_err(InfraError::from)?)
}

fn from_retry_error(err: RetryError<SpaceTradersError>) -> SpaceTradersError {
    match err {
        RetryError::Exhausted { source, .. } | RetryError::NonRetryable { source } => source,
        RetryError::InvalidConfiguration { message } => SpaceTradersError::Config(message),
    }
}
