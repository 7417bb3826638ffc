//! PostgreSQL adapter for PodcastRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::domain::entities::{Podcast, PodcastId};
use crate::domain::ports::PodcastRepository;
use crate::entity::podcast;
use crate::error::DomainError;

/// PostgreSQL implementation of PodcastRepository
pub struct PostgresPodcastRepository {
    db: DatabaseConnection,
}

impl PostgresPodcastRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PodcastRepository for PostgresPodcastRepository {
    async fn find_by_id(&self, id: PodcastId) -> Result<Option<Podcast>, DomainError> {
        let result = podcast::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_ids(&self, ids: &[PodcastId]) -> Result<Vec<Podcast>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = podcast::Entity::find()
            .filter(podcast::Column::PodcastId.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_latest(&self, limit: u64, offset: u64) -> Result<Vec<Podcast>, DomainError> {
        let results = podcast::Entity::find()
            .order_by_desc(podcast::Column::Submitted)
            .order_by_desc(podcast::Column::PodcastId)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        podcast::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }
}

impl From<podcast::Model> for Podcast {
    fn from(model: podcast::Model) -> Self {
        Podcast {
            id: PodcastId(model.podcast_id),
            file: model.file,
            submitted_at: model.submitted.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}
