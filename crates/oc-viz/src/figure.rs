//! Figure description types.
//!
//! Field names follow Plotly's figure JSON so a front end can hand the
//! serialized figure straight to a plotting library.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    /// Canonical serialization; identical figures give identical bytes.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn series_names(&self) -> Vec<&str> {
        self.data.iter().map(Trace::name).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter(ScatterTrace),
    Histogram(HistogramTrace),
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Scatter(t) => &t.name,
            Trace::Histogram(t) => &t.name,
        }
    }

    pub fn color(&self) -> Option<&str> {
        match self {
            Trace::Scatter(t) => Some(t.marker.color.as_str()),
            Trace::Histogram(t) => t.marker.as_ref().map(|m| m.color.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterTrace {
    pub name: String,
    pub mode: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramTrace {
    pub name: String,
    pub x: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
}

impl Axis {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub xanchor: String,
    pub yanchor: String,
    pub x: f64,
    pub y: f64,
}

impl Legend {
    /// Legend tucked into the bottom-right corner of the plot area.
    pub fn bottom_right() -> Self {
        Self {
            xanchor: "right".to_string(),
            yanchor: "bottom".to_string(),
            x: 0.99,
            y: 0.01,
        }
    }
}
