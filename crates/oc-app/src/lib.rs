//! Shared application service layer for opticompare.
//!
//! This crate provides a unified interface for the CLI and any other
//! front end, centralizing the chart collection, dataset ingestion and the
//! event reducer that ties them together.

pub mod charts;
pub mod config;
pub mod error;
pub mod ingest_service;
pub mod session;

// Re-export key types for convenience
pub use charts::{ChartCollectionManager, ChartSpec, RenderedChart};
pub use config::{SessionConfig, load_config};
pub use error::{AppError, AppResult};
pub use ingest_service::{DataIngestionService, UploadOutcome, reset_message};
pub use session::{Session, SessionEvent, SessionOutput};
