use thiserror::Error;

pub type OcResult<T> = Result<T, OcError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OcError {
    #[error("Unknown chart type: {0}")]
    UnknownChartType(String),

    #[error("Chart width out of range: {width} (expected {min}..={max})")]
    WidthOutOfRange { width: u8, min: u8, max: u8 },
}
