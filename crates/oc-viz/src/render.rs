//! Chart-type driven rendering of a dataset listing.

use oc_core::ChartType;
use oc_data::MeasurementTable;
use tracing::debug;

use crate::figure::{Axis, Figure, HistogramTrace, Layout, Legend, Marker, ScatterTrace, Trace};
use crate::palette::color_for;

pub const SCATTER_TITLE: &str = "Estimate of homogeneity for optical images";
pub const SCATTER_X_TITLE: &str = "var_intensity/mean_intensity";
pub const SCATTER_Y_TITLE: &str = "mean intensity";
pub const SCATTER_HEIGHT: u32 = 650;
pub const HISTOGRAM_Y_TITLE: &str = "N";

/// Overlay every dataset on one figure, one series per dataset in listing
/// order.
pub fn render(chart_type: ChartType, datasets: &[(String, MeasurementTable)]) -> Figure {
    debug!(%chart_type, datasets = datasets.len(), "rendering figure");
    match chart_type.histogram_field() {
        None => render_scatter(datasets),
        Some(field) => render_histogram(field, datasets),
    }
}

fn render_scatter(datasets: &[(String, MeasurementTable)]) -> Figure {
    let data = datasets
        .iter()
        .enumerate()
        .map(|(index, (name, table))| {
            Trace::Scatter(ScatterTrace {
                name: name.clone(),
                mode: "markers".to_string(),
                x: column(table, "fano"),
                y: column(table, "mean_intensity"),
                marker: Marker {
                    color: color_for(index).to_string(),
                },
            })
        })
        .collect();

    Figure {
        data,
        layout: Layout {
            title: Some(SCATTER_TITLE.to_string()),
            xaxis: Some(Axis::titled(SCATTER_X_TITLE)),
            yaxis: Some(Axis::titled(SCATTER_Y_TITLE)),
            legend: Some(Legend::bottom_right()),
            height: Some(SCATTER_HEIGHT),
        },
    }
}

fn render_histogram(field: &str, datasets: &[(String, MeasurementTable)]) -> Figure {
    let data = datasets
        .iter()
        .map(|(name, table)| {
            Trace::Histogram(HistogramTrace {
                name: name.clone(),
                x: column(table, field),
                marker: None,
            })
        })
        .collect();

    Figure {
        data,
        layout: Layout {
            title: Some(format!("Histogram of {field}")),
            yaxis: Some(Axis::titled(HISTOGRAM_Y_TITLE)),
            ..Layout::default()
        },
    }
}

fn column(table: &MeasurementTable, field: &str) -> Vec<f64> {
    table.column_f64(field).unwrap_or_default()
}
