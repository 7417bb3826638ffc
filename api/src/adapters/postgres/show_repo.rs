//! PostgreSQL adapter for ShowRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::domain::entities::{Season, SeasonId, Show, ShowId, ShowType, TermId};
use crate::domain::ports::ShowRepository;
use crate::entity::{show, show_season, show_type};
use crate::error::DomainError;

/// Shows with at least one timeslot in any of their seasons
const HAS_TIMESLOTS: &str = "EXISTS (SELECT 1 FROM schedule.show_season ss \
     JOIN schedule.show_season_timeslot t ON t.show_season_id = ss.show_season_id \
     WHERE ss.show_id = \"show\".\"show_id\")";

/// PostgreSQL implementation of ShowRepository
pub struct PostgresShowRepository {
    db: DatabaseConnection,
}

impl PostgresShowRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ShowRepository for PostgresShowRepository {
    async fn find_by_id(&self, id: ShowId) -> Result<Option<Show>, DomainError> {
        let result = show::Entity::find_by_id(id.0)
            .find_also_related(show_type::Entity)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(to_show).transpose()
    }

    async fn find_by_ids(&self, ids: &[ShowId]) -> Result<Vec<Show>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = show::Entity::find()
            .find_also_related(show_type::Entity)
            .filter(show::Column::ShowId.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(to_show).collect()
    }

    async fn find_public_scheduled(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Show>, DomainError> {
        let results = show::Entity::find()
            .find_also_related(show_type::Entity)
            .filter(show_type::Column::Public.eq(true))
            .filter(Expr::cust(HAS_TIMESLOTS))
            .order_by_desc(show::Column::Submitted)
            .order_by_desc(show::Column::ShowId)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(to_show).collect()
    }

    async fn count_public_scheduled(&self) -> Result<u64, DomainError> {
        show::Entity::find()
            .inner_join(show_type::Entity)
            .filter(show_type::Column::Public.eq(true))
            .filter(Expr::cust(HAS_TIMESLOTS))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn find_season(&self, id: SeasonId) -> Result<Option<Season>, DomainError> {
        let result = show_season::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_seasons_of(&self, show_id: ShowId) -> Result<Vec<Season>, DomainError> {
        let results = show_season::Entity::find()
            .filter(show_season::Column::ShowId.eq(show_id.0))
            .order_by_asc(show_season::Column::Submitted)
            .order_by_asc(show_season::Column::ShowSeasonId)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert a show joined with its type to the domain entity
fn to_show(
    (model, show_type): (show::Model, Option<show_type::Model>),
) -> Result<Show, DomainError> {
    let show_type = show_type.ok_or_else(|| {
        DomainError::Database(format!(
            "Show {} has unknown type {}",
            model.show_id, model.show_type_id
        ))
    })?;

    Ok(Show {
        id: ShowId(model.show_id),
        show_type: show_type.into(),
        submitted_at: model.submitted.map(|dt| dt.with_timezone(&Utc)),
    })
}

impl From<show_type::Model> for ShowType {
    fn from(model: show_type::Model) -> Self {
        ShowType {
            id: model.show_type_id,
            name: model.name,
            is_public: model.public.unwrap_or(true),
            has_showdb_entry: model.has_showdb_entry.unwrap_or(true),
            is_collapsible: model.is_collapsible.unwrap_or(false),
            can_be_messaged: model.can_be_messaged.unwrap_or(false),
        }
    }
}

impl From<show_season::Model> for Season {
    fn from(model: show_season::Model) -> Self {
        Season {
            id: SeasonId(model.show_season_id),
            show_id: ShowId(model.show_id),
            term_id: model.termid.map(TermId),
            submitted_at: model.submitted.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}
