//! PostgreSQL adapter for TermRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::entities::{Term, TermId};
use crate::domain::ports::TermRepository;
use crate::entity::terms;
use crate::error::DomainError;

/// PostgreSQL implementation of TermRepository
pub struct PostgresTermRepository {
    db: DatabaseConnection,
}

impl PostgresTermRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TermRepository for PostgresTermRepository {
    async fn find_on(&self, at: DateTime<Utc>) -> Result<Option<Term>, DomainError> {
        let result = terms::Entity::find()
            .filter(terms::Column::Start.lte(at))
            .order_by_desc(terms::Column::Start)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }
}

impl From<terms::Model> for Term {
    fn from(model: terms::Model) -> Self {
        Term {
            id: TermId(model.termid),
            name: model.descr.trim().to_string(),
            start: model.start.with_timezone(&Utc),
            finish: model.finish.with_timezone(&Utc),
        }
    }
}
