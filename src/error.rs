//! Error taxonomy of the synchronization engine.
//!
//! Fetch failures are recovered into the matching store slot, precondition
//! violations are returned to the caller, and serialization failures leave
//! the target configuration untouched.

use std::time::Duration;
use thiserror::Error;

/// A remote call into the data service failed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("upstream returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed payload: {0}")]
    Decode(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            FetchError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            FetchError::Status {
                status: status.as_u16(),
                message: error.to_string(),
            }
        } else {
            FetchError::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        FetchError::Decode(error.to_string())
    }
}

impl From<validator::ValidationErrors> for FetchError {
    fn from(errors: validator::ValidationErrors) -> Self {
        FetchError::Decode(errors.to_string())
    }
}

/// The export collaborator could not produce a file.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExportError {
    #[error("export encoding failed: {0}")]
    Encoding(String),

    #[error("export timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors surfaced synchronously by store operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("no {domain} data loaded; cannot {operation}")]
    NoData {
        domain: &'static str,
        operation: &'static str,
    },

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl StoreError {
    pub(crate) fn no_data(domain: &'static str, operation: &'static str) -> Self {
        StoreError::NoData { domain, operation }
    }
}
