//! Conversions from external infrastructure errors into client errors.

use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use spacetraders_domain::SpaceTradersError;
use url::ParseError as UrlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the client error.
#[derive(Debug)]
pub struct InfraError(pub SpaceTradersError);

impl From<InfraError> for SpaceTradersError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SpaceTradersError> for InfraError {
    fn from(value: SpaceTradersError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SpaceTradersError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        if value.is_builder() {
            return InfraError(SpaceTradersError::Config(format!("invalid request: {value}")));
        }
        if value.is_timeout() {
            return InfraError(SpaceTradersError::Transport("HTTP request timed out".into()));
        }
        if value.is_connect() {
            return InfraError(SpaceTradersError::Transport(format!(
                "HTTP connection failure: {value}"
            )));
        }
        if value.is_decode() || value.is_body() {
            return InfraError(SpaceTradersError::Transport(format!(
                "failed to read response body: {value}"
            )));
        }
        InfraError(SpaceTradersError::Transport(value.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → SpaceTradersError */
/* -------------------------------------------------------------------------- */

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(SpaceTradersError::Decode(value.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → SpaceTradersError */
/* -------------------------------------------------------------------------- */

impl From<UrlError> for InfraError {
    fn from(value: UrlError) -> Self {
        InfraError(SpaceTradersError::Config(format!("invalid URL: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn json_errors_map_to_decode() {
        let err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let mapped: SpaceTradersError = InfraError::from(err).into();
        assert!(matches!(mapped, SpaceTradersError::Decode(_)));
    }

    #[test]
    fn url_errors_map_to_config() {
        let err = url::Url::parse("not a url").unwrap_err();
        let mapped: SpaceTradersError = InfraError::from(err).into();
        assert!(matches!(mapped, SpaceTradersError::Config(_)));
    }

    #[tokio::test]
    async fn timeouts_map_to_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client =
            reqwest::Client::builder().timeout(Duration::from_millis(20)).build().unwrap();
        let err = client.get(server.uri()).send().await.unwrap_err();
        let mapped: SpaceTradersError = InfraError::from(err).into();
        assert_eq!(mapped, SpaceTradersError::Transport("HTTP request timed out".into()));
    }
}
