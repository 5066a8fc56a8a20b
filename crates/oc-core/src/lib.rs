//! oc-core: stable foundation for opticompare.
//!
//! Contains:
//! - ids (chart identifiers and their allocator)
//! - chart (chart type selector and grid width)
//! - error (shared error types)

pub mod chart;
pub mod error;
pub mod ids;

// Re-exports: nice ergonomics for downstream crates
pub use chart::{ChartType, ChartWidth};
pub use error::{OcError, OcResult};
pub use ids::*;
