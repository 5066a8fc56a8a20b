//! Session state and the single event reducer.
//!
//! A front end turns every user action into one [`SessionEvent`] and hands
//! it to [`Session::dispatch`]; events are processed one at a time, to
//! completion.

use oc_core::{ChartId, ChartType, ChartWidth};
use oc_data::UploadFile;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charts::{ChartCollectionManager, RenderedChart};
use crate::config::SessionConfig;
use crate::error::AppResult;
use crate::ingest_service::{DataIngestionService, UploadOutcome, reset_message};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Reset control; `count` is how often it has been clicked.
    Reset { count: u32 },
    /// Add control; width falls back to the configured default.
    AddChart {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<ChartWidth>,
    },
    RemoveChart { id: ChartId },
    ChangeChartType { id: ChartId, chart_type: ChartType },
    RenameChart { id: ChartId, title: String },
    Upload { files: Vec<UploadFile> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutput {
    /// The full chart collection, rendered against the current datasets.
    Charts(Vec<RenderedChart>),
    Uploads(Vec<UploadOutcome>),
    Reset {
        deleted: Vec<String>,
        message: Option<String>,
    },
    /// The event was ignored (reset before any click).
    Unchanged,
}

#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    charts: ChartCollectionManager,
    ingestion: DataIngestionService,
}

impl Session {
    pub fn new(config: SessionConfig) -> AppResult<Self> {
        let ingestion = DataIngestionService::new(&config.storage_root, &config.analysis_type)?;
        Ok(Self {
            config,
            charts: ChartCollectionManager::new(),
            ingestion,
        })
    }

    pub fn charts(&self) -> &ChartCollectionManager {
        &self.charts
    }

    pub fn ingestion(&self) -> &DataIngestionService {
        &self.ingestion
    }

    pub fn dispatch(&mut self, event: SessionEvent) -> AppResult<SessionOutput> {
        debug!(?event, "dispatch");
        match event {
            SessionEvent::Reset { count } => {
                if count == 0 {
                    return Ok(SessionOutput::Unchanged);
                }
                // Charts are only dropped once the storage area is gone.
                let deleted = self.ingestion.reset_all()?;
                self.charts.reset(count);
                let message = reset_message(&deleted);
                Ok(SessionOutput::Reset { deleted, message })
            }
            SessionEvent::AddChart { width } => {
                self.charts
                    .add_chart(width.unwrap_or(self.config.default_chart_width));
                self.rendered()
            }
            SessionEvent::RemoveChart { id } => {
                self.charts.remove_chart(id);
                self.rendered()
            }
            SessionEvent::ChangeChartType { id, chart_type } => {
                self.charts.set_chart_type(id, chart_type)?;
                self.rendered()
            }
            SessionEvent::RenameChart { id, title } => {
                self.charts.rename_chart(id, &title)?;
                self.rendered()
            }
            SessionEvent::Upload { files } => {
                let outcomes = self.ingestion.upload_batch(&files)?;
                Ok(SessionOutput::Uploads(outcomes))
            }
        }
    }

    /// Render every chart from the datasets currently on disk.
    pub fn render_charts(&self) -> AppResult<Vec<RenderedChart>> {
        let datasets = self.ingestion.list_datasets()?;
        Ok(self.charts.render_all(&datasets))
    }

    fn rendered(&self) -> AppResult<SessionOutput> {
        Ok(SessionOutput::Charts(self.render_charts()?))
    }

    /// End the session and clear its storage area.
    pub fn close(mut self) -> AppResult<Vec<String>> {
        self.ingestion.reset_all()
    }
}
