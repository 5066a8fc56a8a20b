//! oc-data: measurement tables, upload decoding and dataset storage.

pub mod ingest;
pub mod store;
pub mod table;
pub mod upload;

use std::path::PathBuf;

pub use ingest::parse_upload;
pub use store::DatasetStore;
pub use table::{FieldValue, MeasurementRow, MeasurementTable, TableError};
pub use upload::{DatasetSummary, UploadFile, decode_payload, validate_filename};

/// Fields every measurement file must carry.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "area",
    "fano",
    "mean_intensity",
    "eccentricity",
    "solidity",
];

/// Objects smaller than this (in pixels) are discarded on ingestion.
pub const MIN_AREA: f64 = 8000.0;

pub type DataResult<T> = Result<T, DataError>;

#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("Failed to decode upload '{filename}': {message}")]
    Decode { filename: String, message: String },

    #[error("Failed to parse '{filename}': {message}")]
    Parse { filename: String, message: String },

    #[error("Storage error at {path:?}: {source}")]
    Storage {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Stored dataset '{filename}' is unreadable: {message}")]
    CorruptDataset { filename: String, message: String },
}

impl DataError {
    /// Errors confined to one uploaded file; the rest of a batch goes on.
    pub fn is_per_file(&self) -> bool {
        matches!(self, DataError::Decode { .. } | DataError::Parse { .. })
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Storage {
            path: path.into(),
            source,
        }
    }
}
