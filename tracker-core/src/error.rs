//! Error types for the event tracker.
//!
//! The store and controller never fail: invalid gestures are ignored.
//! Errors only come from loading configuration and parsing user input.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown filter '{0}'. Expected one of: all, past, upcoming")]
    UnknownFilter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for event tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
