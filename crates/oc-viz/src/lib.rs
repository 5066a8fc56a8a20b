//! oc-viz: figure descriptions for comparison charts.
//!
//! Pure transformations from a dataset listing to a Plotly-compatible
//! figure; no I/O happens here.

pub mod figure;
pub mod palette;
pub mod render;

pub use figure::{Axis, Figure, HistogramTrace, Layout, Legend, Marker, ScatterTrace, Trace};
pub use palette::{PALETTE, color_for};
pub use render::render;
