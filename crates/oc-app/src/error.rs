//! Error types for the oc-app service layer.

use std::path::PathBuf;

use oc_core::ChartId;

use crate::ingest_service::UploadOutcome;

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for every front end.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Chart not found: {0}")]
    ChartNotFound(ChartId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] oc_data::DataError),

    /// A storage failure stopped an upload batch. `outcomes` holds every
    /// file handled before the failure; accepted ones are on disk.
    #[error("Upload aborted at '{filename}' after {} file(s): {source}", .outcomes.len())]
    PartialBatch {
        filename: String,
        outcomes: Vec<UploadOutcome>,
        source: oc_data::DataError,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for oc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<oc_core::OcError> for AppError {
    fn from(err: oc_core::OcError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
