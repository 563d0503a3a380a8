//! Transport layer: one HTTP round trip per named Observatory API call.
//!
//! The [`Transport`] trait is the seam between the orchestrator and the
//! network; [`HttpTransport`] is the reqwest implementation. No retries
//! happen here, and the response body is handed back as raw bytes so the
//! caller owns decoding (and decode-error attribution).

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Production endpoint of the HTTP Observatory API.
pub const ENDPOINT: &str = "https://http-observatory.security.mozilla.org/api/v1";

/// Handshake/connect timeout applied by the default client.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Overall per-request timeout applied by the default client.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The named remote operations of the Observatory API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCall {
    /// Submit a scan (POST) or fetch its current state (GET)
    Analyze,
    /// Detailed subtest results of a completed scan
    GetScanResults,
    /// Scan counts per state, an indicator of scanner load
    GetScannerStates,
    /// Grade → scan-count distribution across all public scans
    GetGradeDistribution,
    /// A host's ten most recent scans
    GetHostHistory,
    /// The ten most recent public scans within a score range
    GetRecentScans,
}

impl ApiCall {
    /// Path segment of this call under the API base URL.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::GetScanResults => "getScanResults",
            Self::GetScannerStates => "getScannerStates",
            Self::GetGradeDistribution => "getGradeDistribution",
            Self::GetHostHistory => "getHostHistory",
            Self::GetRecentScans => "getRecentScans",
        }
    }
}

/// Description of a single API request: call, verb, query and form body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Named remote operation
    pub call: ApiCall,
    /// HTTP verb (GET or POST)
    pub method: Method,
    /// Query-string parameters
    pub query: Vec<(&'static str, String)>,
    /// Form-encoded body parameters (POST only)
    pub form: Vec<(&'static str, String)>,
}

impl ApiRequest {
    /// Describe a GET request for `call`.
    #[must_use]
    pub fn get(call: ApiCall) -> Self {
        Self {
            call,
            method: Method::GET,
            query: Vec::new(),
            form: Vec::new(),
        }
    }

    /// Describe a POST request for `call`.
    #[must_use]
    pub fn post(call: ApiCall) -> Self {
        Self {
            call,
            method: Method::POST,
            query: Vec::new(),
            form: Vec::new(),
        }
    }

    /// Add a query-string parameter.
    #[must_use]
    pub fn query(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.query.push((name, value.into()));
        self
    }

    /// Add a form-body parameter. Booleans are rendered as literal
    /// `"true"`/`"false"` strings, which is what the API expects.
    #[must_use]
    pub fn form(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.form.push((name, value.into()));
        self
    }
}

/// Errors produced by a transport round trip.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Network-level failure: connect, TLS, timeout, or body read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("http request failed: {status}")]
    Status {
        /// Status returned by the server
        status: StatusCode,
    },
}

/// A single request/response exchange against a named API call.
///
/// Implementations must perform exactly one network round trip per
/// `execute` call and must not retry; retries, if any, are the
/// orchestrator's decision.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute the described request and return the raw response body.
    async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>, TransportError>;
}

/// reqwest-backed [`Transport`] implementation.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport against the production endpoint with the default
    /// timeouts (5 s connect/handshake, 10 s per request).
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_base_url(ENDPOINT)
    }

    /// Create a transport with the default timeouts against a custom base
    /// URL, e.g. a self-hosted Observatory instance.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create a transport from a caller-configured `reqwest::Client`. Use
    /// this to control timeouts, proxies or TLS settings yourself.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Base URL this transport talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>, TransportError> {
        let url = format!("{}/{}", self.base_url, request.call.as_str());
        tracing::debug!(method = %request.method, %url, "issuing API request");

        let mut builder = self.client.request(request.method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if !request.form.is_empty() {
            // Sets Content-Type: application/x-www-form-urlencoded and
            // Content-Length along with the encoded body.
            builder = builder.form(&request.form);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { status });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_call_paths() {
        assert_eq!(ApiCall::Analyze.as_str(), "analyze");
        assert_eq!(ApiCall::GetScanResults.as_str(), "getScanResults");
        assert_eq!(ApiCall::GetScannerStates.as_str(), "getScannerStates");
        assert_eq!(ApiCall::GetGradeDistribution.as_str(), "getGradeDistribution");
        assert_eq!(ApiCall::GetHostHistory.as_str(), "getHostHistory");
        assert_eq!(ApiCall::GetRecentScans.as_str(), "getRecentScans");
    }

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::post(ApiCall::Analyze)
            .query("host", "example.com")
            .form("hidden", "true")
            .form("rescan", "false");

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.query, vec![("host", "example.com".to_string())]);
        assert_eq!(
            request.form,
            vec![
                ("hidden", "true".to_string()),
                ("rescan", "false".to_string())
            ]
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let transport =
            HttpTransport::with_client(reqwest::Client::new(), "http://localhost:8080/api/v1/");
        assert_eq!(transport.base_url(), "http://localhost:8080/api/v1");
    }

    #[test]
    fn test_status_error_display() {
        let err = TransportError::Status {
            status: StatusCode::NOT_FOUND,
        };
        assert_eq!(err.to_string(), "http request failed: 404 Not Found");
    }
}
