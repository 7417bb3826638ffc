//! PostgreSQL adapter for TimeslotRepository
//!
//! Timeslot durations are `interval`s, which SeaORM entities cannot map, so
//! these queries are raw statements reading the duration as whole seconds.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use sea_orm::{
    DatabaseBackend, DatabaseConnection, DbErr, FromQueryResult, Statement, Value,
};

use crate::domain::entities::{SeasonId, ShowId, Timeslot, TimeslotId};
use crate::domain::ports::TimeslotRepository;
use crate::error::DomainError;

const TIMESLOT_SELECT: &str = "SELECT t.show_season_timeslot_id AS id, \
     t.show_season_id AS season_id, \
     s.show_id AS show_id, \
     t.start_time AS start_time, \
     EXTRACT(EPOCH FROM t.duration)::bigint AS duration_seconds, \
     COALESCE(st.public, TRUE) AS is_public, \
     COALESCE(st.is_collapsible, FALSE) AS is_collapsible, \
     COALESCE(st.can_be_messaged, FALSE) AS can_be_messaged \
     FROM schedule.show_season_timeslot t \
     JOIN schedule.show_season s ON s.show_season_id = t.show_season_id \
     JOIN schedule.show sh ON sh.show_id = s.show_id \
     JOIN schedule.show_type st ON st.show_type_id = sh.show_type_id";

#[derive(Debug, FromQueryResult)]
struct TimeslotRow {
    id: i32,
    season_id: i32,
    show_id: i32,
    start_time: DateTime<Utc>,
    duration_seconds: i64,
    is_public: bool,
    is_collapsible: bool,
    can_be_messaged: bool,
}

impl From<TimeslotRow> for Timeslot {
    fn from(row: TimeslotRow) -> Self {
        Timeslot {
            id: TimeslotId(row.id),
            season_id: SeasonId(row.season_id),
            show_id: ShowId(row.show_id),
            start: row.start_time,
            duration: TimeDelta::seconds(row.duration_seconds),
            is_public: row.is_public,
            is_collapsible: row.is_collapsible,
            can_be_messaged: row.can_be_messaged,
        }
    }
}

/// PostgreSQL implementation of TimeslotRepository
pub struct PostgresTimeslotRepository {
    db: DatabaseConnection,
}

impl PostgresTimeslotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn query(
        &self,
        conditions: &str,
        values: Vec<Value>,
    ) -> Result<Vec<Timeslot>, DomainError> {
        let sql = format!("{} {}", TIMESLOT_SELECT, conditions);
        let stmt = Statement::from_sql_and_values(DatabaseBackend::Postgres, sql, values);

        let rows = TimeslotRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e: DbErr| DomainError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Timeslot::from).collect())
    }
}

#[async_trait]
impl TimeslotRepository for PostgresTimeslotRepository {
    async fn find_by_id(&self, id: TimeslotId) -> Result<Option<Timeslot>, DomainError> {
        let timeslots = self
            .query("WHERE t.show_season_timeslot_id = $1", vec![id.0.into()])
            .await?;

        Ok(timeslots.into_iter().next())
    }

    async fn find_public_between(
        &self,
        start: DateTime<Utc>,
        finish: DateTime<Utc>,
    ) -> Result<Vec<Timeslot>, DomainError> {
        self.query(
            "WHERE COALESCE(st.public, TRUE) \
             AND t.start_time <= $2 \
             AND t.start_time + t.duration > $1 \
             ORDER BY t.start_time",
            vec![start.into(), finish.into()],
        )
        .await
    }

    async fn find_public_next(
        &self,
        from: DateTime<Utc>,
        count: u64,
    ) -> Result<Vec<Timeslot>, DomainError> {
        self.query(
            "WHERE COALESCE(st.public, TRUE) \
             AND t.start_time + t.duration > $1 \
             ORDER BY t.start_time \
             LIMIT $2",
            vec![from.into(), (count as i64).into()],
        )
        .await
    }

    async fn find_by_season(&self, season_id: SeasonId) -> Result<Vec<Timeslot>, DomainError> {
        self.query(
            "WHERE t.show_season_id = $1 ORDER BY t.start_time",
            vec![season_id.0.into()],
        )
        .await
    }
}
