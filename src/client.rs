//! Observatory client: scan submission, status polling and the read-only
//! statistics endpoints.
//!
//! The interesting part is [`Client::analyze`]: it turns the server-side,
//! multi-state scan job into a single call that either returns the first
//! response or blocks (cancelably) until the scan reaches `FINISHED`.

use crate::error::{Error, Result};
use crate::options::{AnalyzeOptions, ScoreBound};
use crate::transport::{ApiCall, ApiRequest, HttpTransport, Transport};
use crate::types::{
    GradeDistribution, HostHistoryEntry, RecentScans, ScanId, ScanResult, ScanState,
    ScannerStates, TestResults,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::time::{self, Instant, MissedTickBehavior};

const OP_CREATE: &str = "create client";
const OP_INVOKE: &str = "invoke assessment";
const OP_RETRIEVE: &str = "retrieve assessment";
const OP_SCANNER_STATES: &str = "retrieve scanner states";
const OP_TEST_RESULTS: &str = "retrieve test results";
const OP_GRADE_DISTRIBUTION: &str = "retrieve grade distribution";
const OP_HOST_HISTORY: &str = "retrieve host scan history";
const OP_RECENT_SCANS: &str = "retrieve recent scans";

/// Client for the HTTP Observatory API.
///
/// Cheap to clone; holds only the shared transport. Concurrent calls are
/// independent — the client keeps no state between requests, and duplicate
/// scans of one host are deduplicated by the Observatory's own three-minute
/// throttle, not locally.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Create a client against the production endpoint with default
    /// timeouts (5 s handshake, 10 s per request).
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        let transport = HttpTransport::new().map_err(|source| Error::Transport {
            operation: OP_CREATE,
            source,
        })?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Create a client against a custom base URL, e.g. a self-hosted
    /// Observatory instance.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let transport =
            HttpTransport::with_base_url(base_url).map_err(|source| Error::Transport {
                operation: OP_CREATE,
                source,
            })?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Create a client from any [`Transport`] implementation. Use this to
    /// supply a custom-configured [`HttpTransport`] or a test double.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Submit a scan of `host`.
    ///
    /// By default the Observatory returns a cached result if the site was
    /// scanned within the previous 24 hours; [`AnalyzeOptions::rescan`]
    /// bypasses the cache, though the server never scans one host more
    /// often than every three minutes regardless.
    ///
    /// With [`AnalyzeOptions::wait_finished`] set, the call polls the scan
    /// state every [`AnalyzeOptions::poll_interval`] until `FINISHED` and
    /// returns that result. The wait has no built-in upper bound: a scan
    /// that never finishes is bounded only by the caller's
    /// [`AnalyzeOptions::cancel`] token or an [`AnalyzeOptions::max_wait`],
    /// either of which fails the call with [`Error::Cancelled`].
    ///
    /// A remote state of `FAILED` or `ABORTED` — on submission or at any
    /// poll — fails the call with [`Error::ScanFailed`] /
    /// [`Error::ScanAborted`] and is never retried.
    pub async fn analyze(&self, host: &str, options: AnalyzeOptions) -> Result<ScanResult> {
        if options.wait_finished && options.poll_interval.is_zero() {
            return Err(Error::Configuration(
                "poll_interval must be non-zero when wait_finished is set".to_string(),
            ));
        }

        let result = self.invoke_assessment(host, &options).await?;

        if result.state == ScanState::Unknown {
            // The API omits the state when a submission instantly resolves
            // to a prior completed scan; one status fetch fills it in.
            tracing::warn!(host, "analyze returned no state, fetching assessment");
            return self.get_assessment(host).await;
        }

        if result.state == ScanState::Finished || !options.wait_finished {
            return Ok(result);
        }

        self.poll_until_finished(host, &options).await
    }

    /// Retrieve the result of an existing, ongoing or completed scan of
    /// `host`.
    ///
    /// Read-only and idempotent; may be called any number of times. Fails
    /// with [`Error::ScanFailed`] / [`Error::ScanAborted`] when the scan
    /// ended in one of those states.
    pub async fn get_assessment(&self, host: &str) -> Result<ScanResult> {
        let request = ApiRequest::get(ApiCall::Analyze).query("host", host);
        let result: ScanResult = self.execute_json(OP_RETRIEVE, request).await?;
        check_scan_state(OP_RETRIEVE, result.state)?;
        Ok(result)
    }

    /// Retrieve scan counts per state, an indicator of how busy the
    /// Observatory currently is.
    pub async fn get_scanner_states(&self) -> Result<ScannerStates> {
        let request = ApiRequest::get(ApiCall::GetScannerStates);
        self.execute_json(OP_SCANNER_STATES, request).await
    }

    /// Retrieve the detailed subtest results of a scan. Available once the
    /// scan has reached the `FINISHED` state.
    pub async fn get_test_results(&self, scan: ScanId) -> Result<TestResults> {
        let request = ApiRequest::get(ApiCall::GetScanResults).query("scan", scan.to_string());
        self.execute_json(OP_TEST_RESULTS, request).await
    }

    /// Retrieve how many scans have fallen into each possible grade.
    pub async fn get_grade_distribution(&self) -> Result<GradeDistribution> {
        let request = ApiRequest::get(ApiCall::GetGradeDistribution);
        self.execute_json(OP_GRADE_DISTRIBUTION, request).await
    }

    /// Retrieve the ten most recent scans of `host`.
    pub async fn get_scan_history(&self, host: &str) -> Result<Vec<HostHistoryEntry>> {
        let request = ApiRequest::get(ApiCall::GetHostHistory).query("host", host);
        self.execute_json(OP_HOST_HISTORY, request).await
    }

    /// Retrieve the ten most recent public scans falling within the given
    /// score bound, as a host → grade mapping.
    pub async fn get_recent_scans(&self, bound: ScoreBound) -> Result<RecentScans> {
        let (name, value) = bound.query_param();
        let request = ApiRequest::get(ApiCall::GetRecentScans).query(name, value);
        self.execute_json(OP_RECENT_SCANS, request).await
    }

    /// POST the scan submission and map terminal states to errors.
    async fn invoke_assessment(
        &self,
        host: &str,
        options: &AnalyzeOptions,
    ) -> Result<ScanResult> {
        let request = ApiRequest::post(ApiCall::Analyze)
            .query("host", host)
            .form("hidden", bool_str(options.hidden))
            .form("rescan", bool_str(options.rescan));

        let result: ScanResult = self.execute_json(OP_INVOKE, request).await?;
        check_scan_state(OP_INVOKE, result.state)?;
        Ok(result)
    }

    /// Poll the scan state every `poll_interval` until `FINISHED`.
    ///
    /// Cancellation (token or `max_wait` deadline) is observed at tick
    /// boundaries, so cancellation latency is bounded by one poll interval;
    /// an in-flight status fetch is allowed to complete. Fetch errors and
    /// terminal `FAILED`/`ABORTED` states propagate and stop the loop.
    async fn poll_until_finished(
        &self,
        host: &str,
        options: &AnalyzeOptions,
    ) -> Result<ScanResult> {
        let deadline = options.max_wait.map(|max_wait| Instant::now() + max_wait);

        let mut ticker = time::interval(options.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the submission response was
        // the first observation, so consume it.
        ticker.tick().await;

        loop {
            tokio::select! {
                () = options.cancel.cancelled() => {
                    return Err(Error::Cancelled {
                        operation: OP_RETRIEVE,
                        reason: "cancellation token triggered".to_string(),
                    });
                }
                () = wait_for_deadline(deadline) => {
                    return Err(Error::Cancelled {
                        operation: OP_RETRIEVE,
                        reason: format!(
                            "maximum wait of {:?} elapsed",
                            options.max_wait.unwrap_or_default()
                        ),
                    });
                }
                _ = ticker.tick() => {
                    let result = self.get_assessment(host).await?;
                    tracing::debug!(host, state = ?result.state, "polled scan state");
                    if result.state == ScanState::Finished {
                        return Ok(result);
                    }
                }
            }
        }
    }

    /// Execute a request and decode its body, attributing failures to
    /// `operation`.
    async fn execute_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: ApiRequest,
    ) -> Result<T> {
        let body = self
            .transport
            .execute(request)
            .await
            .map_err(|source| Error::Transport { operation, source })?;

        serde_json::from_slice(&body).map_err(|source| Error::Decode { operation, source })
    }
}

/// Sleep until `deadline`, or forever when no deadline is set.
async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// The API expects booleans as literal `"true"`/`"false"` form values.
fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Map terminal failure states to their distinguishable errors.
fn check_scan_state(operation: &'static str, state: ScanState) -> Result<()> {
    match state {
        ScanState::Failed => Err(Error::ScanFailed { operation }),
        ScanState::Aborted => Err(Error::ScanAborted { operation }),
        _ => Ok(()),
    }
}
