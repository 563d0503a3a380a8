//! Error types for the Observatory client.

use crate::transport::TransportError;
use thiserror::Error;

/// Errors that can occur while talking to the HTTP Observatory API.
///
/// Every orchestrator-level variant carries the human-readable name of the
/// high-level operation that failed (`"invoke assessment"`,
/// `"retrieve recent scans"`, ...) so the failing call is identifiable
/// without losing the underlying cause.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure: network error, timeout, or a non-success
    /// HTTP status.
    #[error("{operation} failed: {source}")]
    Transport {
        /// High-level operation that issued the request
        operation: &'static str,
        /// Underlying transport error
        #[source]
        source: TransportError,
    },

    /// The response body was not valid JSON for the expected shape.
    #[error("{operation} failed: malformed response: {source}")]
    Decode {
        /// High-level operation that issued the request
        operation: &'static str,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// The remote scanner gave up on the scan. Terminal; never retried.
    #[error("{operation} failed: scan failed")]
    ScanFailed {
        /// High-level operation that observed the state
        operation: &'static str,
    },

    /// The remote scanner aborted the scan for internal reasons.
    /// Terminal; never retried.
    #[error("{operation} failed: scan aborted")]
    ScanAborted {
        /// High-level operation that observed the state
        operation: &'static str,
    },

    /// The poll loop was stopped by the caller's cancellation token or the
    /// configured maximum wait before a terminal state was reached.
    #[error("{operation} aborted by caller: {reason}")]
    Cancelled {
        /// High-level operation that was cancelled
        operation: &'static str,
        /// What triggered the cancellation
        reason: String,
    },

    /// Invalid option combination.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl Error {
    /// True if the remote scanner reported the scan as failed.
    #[must_use]
    pub fn is_scan_failed(&self) -> bool {
        matches!(self, Self::ScanFailed { .. })
    }

    /// True if the remote scanner aborted the scan.
    #[must_use]
    pub fn is_scan_aborted(&self) -> bool {
        matches!(self, Self::ScanAborted { .. })
    }

    /// True if the call was cancelled by the caller (token or maximum wait).
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Result type alias for Observatory operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_error_display() {
        let err = Error::ScanFailed {
            operation: "invoke assessment",
        };
        assert_eq!(err.to_string(), "invoke assessment failed: scan failed");

        let err = Error::Transport {
            operation: "retrieve assessment",
            source: TransportError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
            },
        };
        assert_eq!(
            err.to_string(),
            "retrieve assessment failed: http request failed: 503 Service Unavailable"
        );
    }

    #[test]
    fn test_cancelled_display() {
        let err = Error::Cancelled {
            operation: "retrieve assessment",
            reason: "cancellation token triggered".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "retrieve assessment aborted by caller: cancellation token triggered"
        );
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_predicates() {
        let failed = Error::ScanFailed {
            operation: "invoke assessment",
        };
        let aborted = Error::ScanAborted {
            operation: "retrieve assessment",
        };
        assert!(failed.is_scan_failed());
        assert!(!failed.is_scan_aborted());
        assert!(aborted.is_scan_aborted());
        assert!(!aborted.is_cancelled());
    }
}
