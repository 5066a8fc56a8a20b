//! In-memory measurement table and its CSV codec.
//!
//! The first CSV column is an opaque row index. It is carried through so a
//! persisted file keeps the same header as the upload, but it never takes
//! part in analysis.

use std::io;

use crate::REQUIRED_FIELDS;

#[derive(thiserror::Error, Debug)]
pub enum TableError {
    #[error("file is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("no header row")]
    Empty,

    #[error("required field '{0}' is missing")]
    MissingField(&'static str),

    #[error("field '{field}' on row {row} is not numeric: {value:?}")]
    NotNumeric {
        field: &'static str,
        row: usize,
        value: String,
    },
}

/// One cell of a measurement row.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Missing,
}

impl FieldValue {
    fn from_cell(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            FieldValue::Missing
        } else if let Ok(value) = trimmed.parse::<f64>() {
            FieldValue::Number(value)
        } else {
            FieldValue::Text(cell.to_string())
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    fn to_cell(&self) -> String {
        match self {
            FieldValue::Number(value) if value.is_nan() => String::new(),
            FieldValue::Number(value) => value.to_string(),
            FieldValue::Text(text) => text.clone(),
            FieldValue::Missing => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    pub index: String,
    pub values: Vec<FieldValue>,
}

/// Rows of one optical sample, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasurementTable {
    pub index_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<MeasurementRow>,
}

impl MeasurementTable {
    /// Parse CSV bytes, checking that every required field is present and
    /// numeric (empty cells are allowed and read as missing).
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, TableError> {
        let text = std::str::from_utf8(bytes)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let mut header_iter = headers.iter();
        let index_name = header_iter.next().ok_or(TableError::Empty)?.to_string();
        let columns: Vec<String> = header_iter.map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut cells = record.iter();
            let index = cells.next().unwrap_or_default().to_string();
            let values = cells.map(FieldValue::from_cell).collect();
            rows.push(MeasurementRow { index, values });
        }

        let table = Self {
            index_name,
            columns,
            rows,
        };
        table.check_required_fields()?;
        Ok(table)
    }

    fn check_required_fields(&self) -> Result<(), TableError> {
        for field in REQUIRED_FIELDS {
            let pos = self
                .column_position(field)
                .ok_or(TableError::MissingField(field))?;
            for (row_idx, row) in self.rows.iter().enumerate() {
                if let Some(FieldValue::Text(value)) = row.values.get(pos) {
                    return Err(TableError::NotNumeric {
                        field,
                        row: row_idx + 1,
                        value: value.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_position(&self, field: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == field)
    }

    pub fn value(&self, row: usize, field: &str) -> Option<&FieldValue> {
        let pos = self.column_position(field)?;
        self.rows.get(row)?.values.get(pos)
    }

    /// Numeric view of a column; missing cells become NaN.
    pub fn column_f64(&self, field: &str) -> Option<Vec<f64>> {
        let pos = self.column_position(field)?;
        Some(
            self.rows
                .iter()
                .map(|row| {
                    row.values
                        .get(pos)
                        .and_then(FieldValue::as_f64)
                        .unwrap_or(f64::NAN)
                })
                .collect(),
        )
    }

    /// Keep rows whose `area` is at least `min_area`. Rows with a missing
    /// area are dropped. Returns the number of rows removed.
    pub fn retain_min_area(&mut self, min_area: f64) -> usize {
        let before = self.rows.len();
        let Some(pos) = self.column_position("area") else {
            self.rows.clear();
            return before;
        };
        self.rows.retain(|row| {
            row.values
                .get(pos)
                .and_then(FieldValue::as_f64)
                .is_some_and(|area| area >= min_area)
        });
        before - self.rows.len()
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut out = csv::Writer::from_writer(writer);
        let header = std::iter::once(self.index_name.as_str())
            .chain(self.columns.iter().map(String::as_str));
        out.write_record(header)?;
        for row in &self.rows {
            let cells: Vec<String> = std::iter::once(row.index.clone())
                .chain(row.values.iter().map(FieldValue::to_cell))
                .collect();
            out.write_record(&cells)?;
        }
        out.flush()?;
        Ok(())
    }
}
