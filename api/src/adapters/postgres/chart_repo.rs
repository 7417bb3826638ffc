//! PostgreSQL adapter for ChartRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::domain::entities::{ChartEntry, Track};
use crate::domain::ports::ChartRepository;
use crate::entity::{chart_release, chart_row, chart_type, rec_track};
use crate::error::DomainError;

/// PostgreSQL implementation of ChartRepository
pub struct PostgresChartRepository {
    db: DatabaseConnection,
}

impl PostgresChartRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChartRepository for PostgresChartRepository {
    async fn latest_releases(
        &self,
        chart_name: &str,
        on: DateTime<Utc>,
        count: u64,
    ) -> Result<Vec<i32>, DomainError> {
        let results = chart_release::Entity::find()
            .inner_join(chart_type::Entity)
            .filter(chart_type::Column::Name.eq(chart_name))
            .filter(chart_release::Column::Submitted.lte(on))
            .order_by_desc(chart_release::Column::Submitted)
            .limit(count)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.chart_release_id).collect())
    }

    async fn entries(&self, release_ids: &[i32]) -> Result<Vec<ChartEntry>, DomainError> {
        if release_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = chart_row::Entity::find()
            .find_also_related(rec_track::Entity)
            .filter(chart_row::Column::ChartReleaseId.is_in(release_ids.iter().copied()))
            .order_by_asc(chart_row::Column::Position)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        // Rows whose track has been removed from the library are skipped
        Ok(results
            .into_iter()
            .filter_map(|(row, track)| {
                track.map(|track| ChartEntry {
                    release_id: row.chart_release_id,
                    position: row.position,
                    track: track.into(),
                })
            })
            .collect())
    }
}

impl From<rec_track::Model> for Track {
    fn from(model: rec_track::Model) -> Self {
        Track {
            id: model.trackid,
            title: model.title,
            artist: model.artist,
        }
    }
}
