//! PostgreSQL adapter for BannerRepository

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, FromQueryResult, Statement};

use crate::domain::entities::Banner;
use super::active_on;
use crate::domain::ports::BannerRepository;
use crate::error::DomainError;

/// Banners whose campaign runs at $2 and has a slot covering day $3, time $4
fn banners_for_location_sql() -> String {
    format!(
        "SELECT DISTINCT b.banner_id AS id, b.alt, b.image, b.target \
         FROM website.banner b \
         JOIN website.banner_campaign c ON c.banner_id = b.banner_id \
         JOIN website.banner_location l ON l.banner_location_id = c.banner_location_id \
         JOIN website.banner_timeslot t ON t.banner_campaign_id = c.banner_campaign_id \
         WHERE l.name = $1 AND {active} \
         AND t.day = $3 \
         AND t.start_time::time <= $4 AND t.end_time::time > $4 \
         ORDER BY b.banner_id",
        active = active_on("c", "$2"),
    )
}

#[derive(Debug, FromQueryResult)]
struct BannerRow {
    id: i32,
    alt: Option<String>,
    image: Option<String>,
    target: Option<String>,
}

/// PostgreSQL implementation of BannerRepository
pub struct PostgresBannerRepository {
    db: DatabaseConnection,
}

impl PostgresBannerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BannerRepository for PostgresBannerRepository {
    async fn for_location(
        &self,
        location: &str,
        at: DateTime<Utc>,
        weekday: i16,
        time: NaiveTime,
    ) -> Result<Vec<Banner>, DomainError> {
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            banners_for_location_sql(),
            [location.into(), at.into(), weekday.into(), time.into()],
        );

        let rows = BannerRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| Banner {
                id: row.id,
                alt: row.alt,
                image: row.image,
                target: row.target,
            })
            .collect())
    }
}
