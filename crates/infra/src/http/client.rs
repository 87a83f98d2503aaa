use std::time::Duration;

use reqwest::{Client as ReqwestClient, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use spacetraders_domain::{Result, SpaceTradersError};
use tracing::debug;
use url::Url;

use super::request::RequestSpec;
use super::response::classify;
use crate::errors::InfraError;

/// Raw outcome of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    /// Classify the response into `T` (see [`classify`]).
    pub fn into_shape<T>(self, strict: bool) -> Result<T>
    where
        T: DeserializeOwned + Serialize,
    {
        classify(self.status, &self.body, strict)
    }
}

/// HTTP transport with a fixed overall timeout.
///
/// Performs exactly one attempt per call; rate-limit retries are layered on
/// top by the API client.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Execute `spec` against `base`, returning the status and body text.
    ///
    /// Only transport failures are errors here; every status code is
    /// returned to the caller for classification.
    pub async fn execute(&self, base: &Url, spec: &RequestSpec) -> Result<HttpResponse> {
        let url = endpoint_url(base, &spec.segments)?;

        let mut builder = self.client.request(spec.method.clone(), url);
        if !spec.query.is_empty() {
            builder = builder.query(&spec.query);
        }
        for (name, value) in &spec.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &spec.body {
            builder = builder.json(body);
        }

        let request = builder.build().map_err(InfraError::from)?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "sending HTTP request");

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                debug!(%method, %path, error = %err, "HTTP request failed");
                return Err(InfraError::from(err).into());
            }
        };

        let status = response.status();
        debug!(%method, %path, %status, "received HTTP response");
        let body = response.text().await.map_err(InfraError::from)?;

        Ok(HttpResponse { status, body })
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(spacetraders_domain::constants::DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| {
            SpaceTradersError::Config(format!("failed to build HTTP client: {err}"))
        })?;

        Ok(HttpClient { client })
    }
}

/// Append `segments` to `base`, percent-encoding each one.
///
/// `"."` and `".."` are refused: URL normalization would silently drop them
/// and address a different endpoint.
fn endpoint_url(base: &Url, segments: &[String]) -> Result<Url> {
    if let Some(segment) = segments.iter().find(|s| matches!(s.as_str(), "" | "." | "..")) {
        return Err(SpaceTradersError::Validation(format!("invalid path segment: {segment:?}")));
    }

    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| SpaceTradersError::Config(format!("base URL cannot carry a path: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn base(server: &MockServer) -> Url {
        Url::parse(&format!("{}/", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn sends_query_headers_and_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/alice/loans"))
            .and(query_param("token", "abc"))
            .and(header("x-trace", "1"))
            .and(body_json(json!({ "type": "STARTUP" })))
            .respond_with(ResponseTemplate::new(201).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let spec = RequestSpec::post(["users", "alice", "loans"])
            .query("token", "abc")
            .header("X-Trace", "1")
            .json(json!({ "type": "STARTUP" }));
        let response = client.execute(&base(&server), &spec).await.unwrap();

        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body, "{}");
    }

    #[tokio::test]
    async fn server_errors_are_returned_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response =
            client.execute(&base(&server), &RequestSpec::get(["game", "status"])).await.unwrap();

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        let err = response.into_shape::<serde_json::Value>(false).unwrap_err();
        assert_eq!(err.api_error().map(|e| e.code), Some(500));
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED
        let url = Url::parse(&format!("http://{addr}/")).unwrap();

        let client = HttpClient::builder().timeout(Duration::from_secs(2)).build().unwrap();
        match client.execute(&url, &RequestSpec::get(["game", "status"])).await {
            Err(SpaceTradersError::Transport(msg)) => {
                assert!(msg.to_lowercase().contains("http"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    fn segments(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| (*part).to_string()).collect()
    }

    #[test]
    fn endpoint_url_escapes_each_segment() {
        let base = Url::parse("https://api.example.test/v1/").unwrap();

        let url = endpoint_url(&base, &segments(&["game", "locations", "OE-PM"])).unwrap();
        assert_eq!(url.as_str(), "https://api.example.test/v1/game/locations/OE-PM");

        let url =
            endpoint_url(&base, &segments(&["game", "locations", "../../users/alice"])).unwrap();
        assert_eq!(url.path(), "/v1/game/locations/..%2F..%2Fusers%2Falice");

        let url = endpoint_url(&base, &segments(&["game", "locations", "OE?type=MOON#x"])).unwrap();
        assert_eq!(url.path(), "/v1/game/locations/OE%3Ftype=MOON%23x");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn endpoint_url_rejects_dot_segments() {
        let base = Url::parse("https://api.example.test/").unwrap();
        for bad in ["..", ".", ""] {
            let err = endpoint_url(&base, &segments(&["game", "locations", bad])).unwrap_err();
            assert!(matches!(err, SpaceTradersError::Validation(_)), "{bad:?} gave {err:?}");
        }
    }
}
