//! Error types for the fame runtime.
//!
//! Absent page elements are not errors: lookups return `Option`. What lives
//! here are the faults that end a resolution (`SessionError`), the polling
//! outcome (`WaitError`), and the file-facing errors of config and dataset
//! handling.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Fatal browser-session faults. The session should not be reused after one
/// of these; callers close it and initialize a new one.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no supported browser matches platform '{0}'")]
    UnsupportedPlatform(String),

    #[error("browser session is not active")]
    NotActive,

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("browser protocol error: {0}")]
    Protocol(String),

    #[error("element handle {0} is stale")]
    StaleElement(usize),
}

/// Outcome of a bounded poll that did not produce a value.
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Errors reading, editing, or writing the tabular dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("column has {actual} values but dataset has {expected} rows")]
    LengthMismatch { expected: usize, actual: usize },
}
