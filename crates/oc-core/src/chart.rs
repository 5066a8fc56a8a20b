//! Chart selectors shared by the renderer and the chart collection.

use core::fmt;
use core::str::FromStr;

use crate::error::{OcError, OcResult};

/// What a chart shows: the homogeneity scatter or a histogram of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ChartType {
    #[default]
    Scatter,
    MeanIntensity,
    Eccentricity,
    Area,
    Solidity,
}

impl ChartType {
    pub const ALL: [ChartType; 5] = [
        ChartType::Scatter,
        ChartType::MeanIntensity,
        ChartType::Eccentricity,
        ChartType::Area,
        ChartType::Solidity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Scatter => "scatter",
            ChartType::MeanIntensity => "mean_intensity",
            ChartType::Eccentricity => "eccentricity",
            ChartType::Area => "area",
            ChartType::Solidity => "solidity",
        }
    }

    /// Human readable option text for a type selector.
    pub fn label(self) -> &'static str {
        match self {
            ChartType::Scatter => "Homogeneity (mean vs fano)",
            ChartType::MeanIntensity => "Mean intensity",
            ChartType::Eccentricity => "Eccentricity",
            ChartType::Area => "Area",
            ChartType::Solidity => "Solidity",
        }
    }

    /// Field histogrammed by this chart; `None` for the scatter.
    pub fn histogram_field(self) -> Option<&'static str> {
        match self {
            ChartType::Scatter => None,
            other => Some(other.as_str()),
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = OcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| OcError::UnknownChartType(s.to_string()))
    }
}

/// Grid column span of a chart (12-column layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct ChartWidth(u8);

impl ChartWidth {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 12;
    pub const FULL: ChartWidth = ChartWidth(Self::MAX);

    pub fn new(width: u8) -> OcResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&width) {
            Ok(Self(width))
        } else {
            Err(OcError::WidthOutOfRange {
                width,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for ChartWidth {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<u8> for ChartWidth {
    type Error = OcError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChartWidth> for u8 {
    fn from(width: ChartWidth) -> Self {
        width.0
    }
}
