//! Batch upload, listing and reset over one session's dataset store.

use oc_data::{DataError, DatasetStore, DatasetSummary, MeasurementTable, UploadFile};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};

/// Message shown in place of a summary when a file is rejected.
pub const REJECTED_MESSAGE: &str = "There was an error processing this file.";

/// Result of one file in an upload batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    Accepted(DatasetSummary),
    Rejected { filename: String, message: String },
}

impl UploadOutcome {
    pub fn filename(&self) -> &str {
        match self {
            UploadOutcome::Accepted(summary) => &summary.filename,
            UploadOutcome::Rejected { filename, .. } => filename,
        }
    }
}

/// Owns the dataset store of one session. Mutations take `&mut self`, so a
/// parse-and-persist never interleaves with a delete-all.
#[derive(Debug)]
pub struct DataIngestionService {
    store: DatasetStore,
}

impl DataIngestionService {
    pub fn new(storage_root: &Path, analysis_type: &str) -> AppResult<Self> {
        Ok(Self {
            store: DatasetStore::new(storage_root, analysis_type)?,
        })
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Decode, filter and persist a single upload.
    pub fn parse_upload(&mut self, upload: &UploadFile) -> AppResult<DatasetSummary> {
        Ok(oc_data::parse_upload(&mut self.store, upload)?)
    }

    /// Process every file in order. A bad file is reported in its outcome
    /// and does not block its siblings. A storage failure stops the batch
    /// with [`AppError::PartialBatch`], which carries the outcomes of the
    /// files already handled.
    pub fn upload_batch(&mut self, files: &[UploadFile]) -> AppResult<Vec<UploadOutcome>> {
        let mut outcomes = Vec::with_capacity(files.len());
        for upload in files {
            match oc_data::parse_upload(&mut self.store, upload) {
                Ok(summary) => outcomes.push(UploadOutcome::Accepted(summary)),
                Err(err) if err.is_per_file() => {
                    warn!(filename = %upload.filename, error = %err, "rejected upload");
                    outcomes.push(rejected(&upload.filename, &err));
                }
                Err(err) => {
                    error!(
                        filename = %upload.filename,
                        handled = outcomes.len(),
                        error = %err,
                        "upload batch aborted"
                    );
                    return Err(AppError::PartialBatch {
                        filename: upload.filename.clone(),
                        outcomes,
                        source: err,
                    });
                }
            }
        }
        Ok(outcomes)
    }

    /// Every persisted dataset, re-read from disk, sorted by filename.
    pub fn list_datasets(&self) -> AppResult<Vec<(String, MeasurementTable)>> {
        Ok(self.store.list_datasets()?)
    }

    /// Delete the whole storage area; returns what was there before.
    pub fn reset_all(&mut self) -> AppResult<Vec<String>> {
        let deleted = self.store.reset_all()?;
        info!(count = deleted.len(), "deleted stored datasets");
        Ok(deleted)
    }
}

fn rejected(filename: &str, err: &DataError) -> UploadOutcome {
    UploadOutcome::Rejected {
        filename: filename.to_string(),
        message: format!("{} ({})", REJECTED_MESSAGE, err),
    }
}

/// User-facing summary of a reset; `None` when nothing was deleted.
pub fn reset_message(deleted: &[String]) -> Option<String> {
    if deleted.is_empty() {
        None
    } else {
        Some(format!("Previous .csv files deleted: {:?}", deleted))
    }
}
