//! Upload payloads and their summaries.

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{DataError, DataResult};

/// One file as delivered by the upload control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadFile {
    pub filename: String,
    /// Data URL: `"<metadata-prefix>,<base64 bytes>"`.
    pub contents: String,
    pub last_modified: DateTime<Utc>,
}

impl UploadFile {
    /// Wrap raw file bytes the way a browser upload would deliver them.
    pub fn from_bytes(
        filename: impl Into<String>,
        bytes: &[u8],
        last_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            filename: filename.into(),
            contents: format!(
                "data:text/csv;base64,{}",
                general_purpose::STANDARD.encode(bytes)
            ),
            last_modified,
        }
    }
}

/// Outcome of one accepted upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub filename: String,
    pub timestamp: DateTime<Utc>,
    pub row_count: usize,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): number of entries: {}",
            self.filename,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.row_count
        )
    }
}

/// Decode the bytes after the first comma of a data URL payload.
pub fn decode_payload(filename: &str, contents: &str) -> DataResult<Vec<u8>> {
    let (_prefix, encoded) = contents
        .split_once(',')
        .ok_or_else(|| DataError::Decode {
            filename: filename.to_string(),
            message: "payload has no ',' separator".to_string(),
        })?;

    general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| DataError::Decode {
            filename: filename.to_string(),
            message: e.to_string(),
        })
}

/// A dataset name must be a single, plain path component.
pub fn validate_filename(filename: &str) -> DataResult<()> {
    let invalid = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\'])
        || filename.contains('\0');
    if invalid {
        return Err(DataError::Parse {
            filename: filename.to_string(),
            message: "invalid filename".to_string(),
        });
    }
    Ok(())
}
