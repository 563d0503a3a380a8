//! Plain-data configuration for scan submission and recent-scan queries.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default spacing between status polls while waiting for a scan to finish.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Options for [`Client::analyze`](crate::Client::analyze).
///
/// A complete record with documented defaults; construct it with
/// [`AnalyzeOptions::default`] and override fields through the `with_*`
/// builders (or directly, all fields are public).
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Hide the scan from the Observatory's public recent-results listings.
    /// Default: `false`.
    pub hidden: bool,

    /// Bypass the 24-hour result cache and request a fresh scan. The
    /// Observatory still refuses to scan any host more often than every
    /// three minutes and returns the cached result instead.
    /// Default: `false`.
    pub rescan: bool,

    /// Block until the scan reaches the `FINISHED` state instead of
    /// returning the first response. Default: `false`.
    pub wait_finished: bool,

    /// Spacing between status polls while waiting. Must be non-zero when
    /// `wait_finished` is set. Default: 10 seconds. Polling faster only
    /// raises the status-check frequency; scan throughput is bounded by the
    /// Observatory's own three-minute throttle.
    pub poll_interval: Duration,

    /// Optional upper bound on the total time spent waiting. When it
    /// elapses the call fails with a cancellation error. Default: `None`,
    /// in which case the wait is unbounded and `cancel` is the only way to
    /// stop a scan that never finishes.
    pub max_wait: Option<Duration>,

    /// Cancellation token observed at every poll-tick boundary. Defaults to
    /// a fresh token that never fires.
    pub cancel: CancellationToken,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            hidden: false,
            rescan: false,
            wait_finished: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: None,
            cancel: CancellationToken::new(),
        }
    }
}

impl AnalyzeOptions {
    /// Create options with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide the scan from public result listings.
    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Bypass the 24-hour result cache.
    #[must_use]
    pub fn with_rescan(mut self, rescan: bool) -> Self {
        self.rescan = rescan;
        self
    }

    /// Block until the scan finishes, polling at `poll_interval`.
    #[must_use]
    pub fn with_wait_finished(mut self, poll_interval: Duration) -> Self {
        self.wait_finished = true;
        self.poll_interval = poll_interval;
        self
    }

    /// Set an upper bound on the total wait time.
    #[must_use]
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Set the cancellation token observed by the poll loop.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Score bound for [`Client::get_recent_scans`](crate::Client::get_recent_scans).
///
/// The API accepts exactly one of a minimum or maximum score; making this an
/// enum rules out supplying both (or neither) at the type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBound {
    /// Only return scans with a score of at least this value.
    Min(u32),
    /// Only return scans with a score of at most this value.
    Max(u32),
}

impl ScoreBound {
    /// Query parameter rendering of this bound.
    #[must_use]
    pub(crate) fn query_param(self) -> (&'static str, String) {
        match self {
            Self::Min(score) => ("min", score.to_string()),
            Self::Max(score) => ("max", score.to_string()),
        }
    }
}
