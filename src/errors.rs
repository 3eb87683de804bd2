//! Structured error types for upstream fetches
//!
//! Every failure maps to "no data this round" for the unit of work being
//! processed; callers log and continue rather than crash.

use thiserror::Error;

/// Failure modes for a single upstream call
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Network-level failure: connection, TLS, timeout
    #[error("transport failure calling {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// Upstream answered with a non-success status
    #[error("upstream returned HTTP {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },

    /// Body did not match the expected shape
    #[error("failed to parse response from {endpoint}: {message}")]
    Parse { endpoint: String, message: String },
}

impl FetchError {
    pub fn transport(endpoint: &str, err: impl ToString) -> Self {
        FetchError::Transport {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }

    pub fn parse(endpoint: &str, err: impl ToString) -> Self {
        FetchError::Parse {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }
}
