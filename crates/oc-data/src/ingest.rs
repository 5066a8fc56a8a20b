//! Decode, parse, filter and persist one upload.

use tracing::{debug, info};

use crate::store::DatasetStore;
use crate::table::MeasurementTable;
use crate::upload::{DatasetSummary, UploadFile, decode_payload, validate_filename};
use crate::{DataError, DataResult, MIN_AREA};

/// Run one upload through the pipeline.
///
/// Nothing is written unless decoding and parsing both succeed. Only rows
/// with `area >= MIN_AREA` are persisted.
pub fn parse_upload(store: &mut DatasetStore, upload: &UploadFile) -> DataResult<DatasetSummary> {
    let filename = upload.filename.as_str();
    validate_filename(filename)?;

    let bytes = decode_payload(filename, &upload.contents)?;
    let mut table = MeasurementTable::from_csv_bytes(&bytes).map_err(|e| DataError::Parse {
        filename: filename.to_string(),
        message: e.to_string(),
    })?;

    let dropped = table.retain_min_area(MIN_AREA);
    debug!(filename, dropped, kept = table.len(), "applied area filter");

    store.save_dataset(filename, &table)?;
    info!(filename, rows = table.len(), "persisted dataset");

    Ok(DatasetSummary {
        filename: filename.to_string(),
        timestamp: upload.last_modified,
        row_count: table.len(),
    })
}
