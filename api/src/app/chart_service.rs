//! Music charts
//!
//! The URY chart proper (`chart`) and Recommended Listening (`music`), each
//! shown with where every track stood in the previous release.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entities::{ChartEntry, ChartRow};
use crate::domain::ports::ChartRepository;
use crate::error::AppError;

/// Chart type name of the URY chart
pub const CHART: &str = "chart";

/// Chart type name of Recommended Listening
pub const RECOMMENDED: &str = "music";

/// Pair the newest release's entries with positions from the one before.
///
/// A track appearing twice in the previous release keeps its last position.
pub fn with_last_positions(current: Vec<ChartEntry>, previous: &[ChartEntry]) -> Vec<ChartRow> {
    let last_positions: HashMap<i32, i16> = previous
        .iter()
        .map(|entry| (entry.track.id, entry.position))
        .collect();

    current
        .into_iter()
        .map(|entry| ChartRow {
            last_position: last_positions.get(&entry.track.id).copied(),
            position: entry.position,
            track: entry.track,
        })
        .collect()
}

pub struct ChartService<CR>
where
    CR: ChartRepository,
{
    charts: Arc<CR>,
}

impl<CR> ChartService<CR>
where
    CR: ChartRepository,
{
    pub fn new(charts: Arc<CR>) -> Self {
        Self { charts }
    }

    /// The chart that was newest at `on` (default now); `None` if the chart
    /// has never been released
    pub async fn latest(
        &self,
        chart_name: &str,
        on: Option<DateTime<Utc>>,
    ) -> Result<Option<Vec<ChartRow>>, AppError> {
        let on = on.unwrap_or_else(Utc::now);
        let releases = self.charts.latest_releases(chart_name, on, 2).await?;
        let Some(&current_id) = releases.first() else {
            return Ok(None);
        };

        let entries = self.charts.entries(&releases).await?;
        let (current, previous): (Vec<ChartEntry>, Vec<ChartEntry>) = entries
            .into_iter()
            .partition(|entry| entry.release_id == current_id);

        Ok(Some(with_last_positions(current, &previous)))
    }
}
