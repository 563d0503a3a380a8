//! httpobs - async client for the Mozilla HTTP Observatory API.
//!
//! The Observatory scans a website's security headers and produces a letter
//! grade and numeric score. Scans run asynchronously on the server side;
//! this crate turns that multi-state job into a single call that either
//! returns immediately or blocks (cancelably) until the scan finishes.
//!
//! # Features
//!
//! - **Scan submission**: invoke a scan, with cache-bypass and
//!   hidden-result flags
//! - **Synchronous-looking waits**: poll the scan state at a configurable
//!   interval until `FINISHED`, bounded only by the caller's cancellation
//!   token or an optional maximum wait
//! - **Statistics endpoints**: scanner load, grade distribution, per-host
//!   scan history, recent scans by score range
//! - **Pluggable transport**: a trait seam over the single-request HTTP
//!   exchange, for custom clients and test doubles
//!
//! # Example
//!
//! ```rust,no_run
//! use httpobs::{AnalyzeOptions, Client};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new()?;
//!
//! // Submit a scan and block until it finishes, polling every 10 seconds.
//! let result = client
//!     .analyze(
//!         "observatory.mozilla.org",
//!         AnalyzeOptions::new().with_wait_finished(Duration::from_secs(10)),
//!     )
//!     .await?;
//!
//! println!("grade {} (score {})", result.grade, result.score);
//! # Ok(())
//! # }
//! ```
//!
//! # Waiting and cancellation
//!
//! A waiting `analyze` call has no built-in deadline: scan duration is
//! unpredictable, so the upper bound belongs to the caller. Supply a
//! [`tokio_util::sync::CancellationToken`] through
//! [`AnalyzeOptions::with_cancel`] (or a duration through
//! [`AnalyzeOptions::with_max_wait`]); cancellation is observed at every
//! poll-tick boundary and surfaces as [`Error::Cancelled`] rather than a
//! partial result.
//!
//! The Observatory itself never scans one host more often than every three
//! minutes; the poll interval only controls status-check frequency.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod client;
pub mod error;
pub mod options;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use client::Client;
pub use error::{Error, Result};
pub use options::{AnalyzeOptions, ScoreBound, DEFAULT_POLL_INTERVAL};
pub use transport::{ApiCall, ApiRequest, HttpTransport, Transport, TransportError, ENDPOINT};
pub use types::{
    GradeDistribution, HostHistoryEntry, RecentScans, ScanId, ScanResult, ScanState,
    ScannerStates, TestResult, TestResults,
};
