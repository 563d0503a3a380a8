//! Data model for HTTP Observatory API responses.
//!
//! Every type here is produced by decoding a response body; the client never
//! mutates a result, it only forwards it or fetches a fresh one. Timestamps
//! are kept as the RFC-1123 strings the API emits.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier assigned to a scan by the Observatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ScanId(pub i64);

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// State of a scan as reported by the Observatory.
///
/// `Finished`, `Failed` and `Aborted` are terminal; no further transition
/// occurs once one of them is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanState {
    /// Issued by the API but not yet picked up by a scanner instance
    Pending,
    /// Assigned to a scanning instance
    Starting,
    /// Currently in the process of scanning the website
    Running,
    /// Completed successfully
    Finished,
    /// Failed to complete, typically because the site was unavailable
    Failed,
    /// Aborted for internal technical reasons
    Aborted,
    /// State missing or empty in the response. The API sometimes omits the
    /// state when a submission resolves to an already-completed cached scan.
    #[default]
    #[serde(other)]
    Unknown,
}

impl ScanState {
    /// True for `Finished`, `Failed` and `Aborted`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Failed | Self::Aborted)
    }
}

/// Summarized result of a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScanResult {
    /// Unique ID number assigned to the scan
    #[serde(default)]
    pub scan_id: ScanId,

    /// Current state of the scan
    #[serde(default)]
    pub state: ScanState,

    /// Final grade assessed upon a completed scan
    #[serde(default)]
    pub grade: String,

    /// Final score assessed upon a completed scan
    #[serde(default)]
    pub score: i32,

    /// Risk likelihood indicator equivalent to the grade
    #[serde(default)]
    pub likelihood_indicator: String,

    /// Timestamp for when the scan was first requested
    #[serde(default)]
    pub start_time: String,

    /// Timestamp for when the scan completed
    #[serde(default)]
    pub end_time: String,

    /// Number of subtests that were assigned a passing result
    #[serde(default)]
    pub tests_passed: u32,

    /// Number of subtests that were assigned a fail result
    #[serde(default)]
    pub tests_failed: u32,

    /// Total number of tests assessed at the time of the scan
    #[serde(default)]
    pub tests_quantity: u32,

    /// The entirety of the site's HTTP response headers
    #[serde(default)]
    pub response_headers: BTreeMap<String, String>,

    /// Whether the scan results are unlisted on the recent-results page
    #[serde(default)]
    pub hidden: bool,
}

/// Scan counts per state across the whole Observatory.
///
/// The pending, starting and running counts are a good indicator of the
/// current scanner load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScannerStates {
    /// Scans aborted for internal technical reasons
    #[serde(rename = "ABORTED", default)]
    pub aborted: u64,
    /// Scans that failed to complete
    #[serde(rename = "FAILED", default)]
    pub failed: u64,
    /// Scans completed successfully
    #[serde(rename = "FINISHED", default)]
    pub finished: u64,
    /// Scans issued but not yet picked up
    #[serde(rename = "PENDING", default)]
    pub pending: u64,
    /// Scans assigned to a scanner instance
    #[serde(rename = "STARTING", default)]
    pub starting: u64,
    /// Scans currently in progress
    #[serde(rename = "RUNNING", default)]
    pub running: u64,
}

/// Short summary of a past scan of a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HostHistoryEntry {
    /// Unique ID number assigned to the scan
    #[serde(default)]
    pub scan_id: ScanId,
    /// Grade assessed by the scan
    #[serde(default)]
    pub grade: String,
    /// Score assessed by the scan
    #[serde(default)]
    pub score: i32,
    /// Timestamp for when the scan completed
    #[serde(default)]
    pub end_time: String,
    /// Completion time as a unix timestamp
    #[serde(default)]
    pub end_time_unix_timestamp: i64,
}

/// Grade → scan-count mapping across all public Observatory scans.
pub type GradeDistribution = BTreeMap<String, u64>;

/// Host → grade mapping for the most recent public scans.
pub type RecentScans = BTreeMap<String, String>;

/// Detailed result of a single subtest of a completed scan.
///
/// The `output` payload differs per subtest (CSP parse trees, redirect
/// routes, cookie attributes, ...) and is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TestResult {
    /// Short machine name of the subtest
    #[serde(default)]
    pub name: String,
    /// Expected result for a passing site
    #[serde(default)]
    pub expectation: String,
    /// Whether the subtest passed
    #[serde(default)]
    pub pass: bool,
    /// Actual result of the subtest
    #[serde(default)]
    pub result: String,
    /// Human-readable description of the result
    #[serde(default)]
    pub score_description: String,
    /// Score modifier applied by this subtest
    #[serde(default)]
    pub score_modifier: i32,
    /// Subtest-specific output payload
    #[serde(default)]
    pub output: serde_json::Value,
}

/// Subtest name → detailed result, as returned by `getScanResults`.
pub type TestResults = BTreeMap<String, TestResult>;
