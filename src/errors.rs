use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for ledger, aggregation, and storage failures.
///
/// Every variant is recoverable: callers surface the message and carry on
/// with the state they already hold.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Malformed data: {0}")]
    Parse(String),
}

pub type Result<T> = StdResult<T, TrackerError>;

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Parse(err.to_string())
    }
}
