//! Chart collection management.
//!
//! Owns the ordered list of chart specifications. Insertion order is display
//! order; ids come from a session-wide counter and are never reused.

use oc_core::{ChartId, ChartType, ChartWidth, IdAllocator, next_id};
use oc_data::MeasurementTable;
use oc_viz::Figure;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

/// Configuration of one displayed chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id: ChartId,
    pub width: ChartWidth,
    pub chart_type: ChartType,
    /// Free-text name; front ends show "New Chart" while it is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A chart together with the figure drawn from the current datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedChart {
    #[serde(flatten)]
    pub spec: ChartSpec,
    pub figure: Figure,
}

#[derive(Debug, Default)]
pub struct ChartCollectionManager {
    charts: Vec<ChartSpec>,
    allocator: IdAllocator,
}

impl ChartCollectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn charts(&self) -> &[ChartSpec] {
        &self.charts
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn get(&self, id: ChartId) -> Option<&ChartSpec> {
        self.charts.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: ChartId) -> AppResult<&mut ChartSpec> {
        self.charts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(AppError::ChartNotFound(id))
    }

    /// Clear every chart. Ignored while the reset control has never been
    /// clicked (`count == 0`). Returns whether the collection was cleared.
    pub fn reset(&mut self, count: u32) -> bool {
        if count == 0 {
            return false;
        }
        debug!(removed = self.charts.len(), "reset chart collection");
        self.charts.clear();
        true
    }

    /// Append a scatter chart with a fresh id.
    pub fn add_chart(&mut self, width: ChartWidth) -> ChartId {
        let id = self.allocator.next();
        self.push(id, width)
    }

    /// Append a chart whose id is derived from the click counts of every
    /// add control. Falls back to the session counter if the derived id
    /// would not be fresh.
    pub fn add_chart_from_counts(
        &mut self,
        width: ChartWidth,
        counts_per_width: &[Option<u32>],
    ) -> ChartId {
        let id = self.allocator.claim(next_id(counts_per_width));
        self.push(id, width)
    }

    fn push(&mut self, id: ChartId, width: ChartWidth) -> ChartId {
        debug!(%id, width = width.get(), "add chart");
        self.charts.push(ChartSpec {
            id,
            width,
            chart_type: ChartType::default(),
            title: None,
        });
        id
    }

    /// Remove the chart with `id`; survivors keep their relative order.
    pub fn remove_chart(&mut self, id: ChartId) -> Option<ChartSpec> {
        let pos = self.charts.iter().position(|c| c.id == id)?;
        debug!(%id, pos, "remove chart");
        Some(self.charts.remove(pos))
    }

    /// Remove the chart whose remove control fired, given one signal per
    /// position. Anything but exactly one set signal removes nothing.
    pub fn remove_chart_by_signals(&mut self, signals: &[Option<u32>]) -> Option<ChartSpec> {
        let mut fired = signals
            .iter()
            .enumerate()
            .filter(|(_, signal)| signal.is_some())
            .map(|(pos, _)| pos);

        let (Some(pos), None) = (fired.next(), fired.next()) else {
            warn!("remove signals did not identify exactly one chart; ignoring");
            return None;
        };
        if pos >= self.charts.len() {
            warn!(pos, len = self.charts.len(), "remove signal out of range; ignoring");
            return None;
        }
        Some(self.charts.remove(pos))
    }

    pub fn set_chart_type(&mut self, id: ChartId, chart_type: ChartType) -> AppResult<()> {
        self.get_mut(id)?.chart_type = chart_type;
        Ok(())
    }

    /// Set the chart's name; an empty title clears it.
    pub fn rename_chart(&mut self, id: ChartId, title: &str) -> AppResult<()> {
        let title = title.trim();
        self.get_mut(id)?.title = (!title.is_empty()).then(|| title.to_string());
        Ok(())
    }

    /// Render every chart, in display order, against one dataset listing.
    pub fn render_all(&self, datasets: &[(String, MeasurementTable)]) -> Vec<RenderedChart> {
        self.charts
            .iter()
            .map(|spec| RenderedChart {
                spec: spec.clone(),
                figure: oc_viz::render(spec.chart_type, datasets),
            })
            .collect()
    }
}
