//! PostgreSQL adapter for MetadataRepository
//!
//! Metadata lives in one table per subject kind and strand, plus package
//! tables for kinds that can be entered into packages. Table names come from
//! `SubjectKind` and are never user input; everything else is bound.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseBackend, DatabaseConnection, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, Statement,
};

use crate::domain::entities::{
    package_metadata_table, MetadataKey, MetadataRow, SearchOrder, Strand, SubjectKind,
};
use super::active_on;
use crate::domain::ports::MetadataRepository;
use crate::entity::metadata_key;
use crate::error::DomainError;

/// ILIKE pattern matching `term` anywhere, with wildcards in `term` escaped
pub(crate) fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[derive(Debug, FromQueryResult)]
struct MetadataQueryRow {
    subject_id: i32,
    key: String,
    value: String,
    cache_duration: i32,
}

#[derive(Debug, FromQueryResult)]
struct SubjectIdRow {
    subject_id: i32,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    count: i64,
}

/// PostgreSQL implementation of MetadataRepository
pub struct PostgresMetadataRepository {
    db: DatabaseConnection,
}

impl PostgresMetadataRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Union of metadata sources with their priorities; binds $1 = subject
    /// ids, $2 = keys, $3 = time
    fn sources_sql(kind: SubjectKind, strand: Strand) -> String {
        let column = kind.subject_column();
        let own = format!(
            "SELECT m.{column} AS subject_id, k.name AS key, m.metadata_value AS value, \
             COALESCE(k.cache_duration, 300) AS cache_duration, \
             0 AS priority, m.effective_from AS effective_from \
             FROM {table} m \
             JOIN metadata.metadata_key k ON k.metadata_key_id = m.metadata_key_id \
             WHERE m.{column} = ANY($1) AND k.name = ANY($2) AND {active}",
            column = column,
            table = kind.metadata_table(strand),
            active = active_on("m", "$3"),
        );

        match kind.package_entry_table() {
            Some(entries) => format!(
                "{own} UNION ALL \
                 SELECT e.{column} AS subject_id, k.name AS key, p.metadata_value AS value, \
                 COALESCE(k.cache_duration, 300) AS cache_duration, \
                 1 AS priority, p.effective_from AS effective_from \
                 FROM {entries} e \
                 JOIN {package} p ON p.package_id = e.package_id \
                 JOIN metadata.metadata_key k ON k.metadata_key_id = p.metadata_key_id \
                 WHERE e.{column} = ANY($1) AND k.name = ANY($2) \
                 AND {package_active}",
                own = own,
                column = column,
                entries = entries,
                package = package_metadata_table(strand),
                package_active = active_on("p", "$3"),
            ),
            None => own,
        }
    }

    /// Restriction to subjects the public may search; joins against `s`
    fn visible_sql(kind: SubjectKind) -> &'static str {
        match kind {
            SubjectKind::Show => {
                " JOIN schedule.show_type t ON t.show_type_id = s.show_type_id \
                 AND COALESCE(t.public, TRUE)"
            }
            _ => "",
        }
    }

    /// Text matches for a search; binds $1 = pattern, $2 = keys, $3 = time
    fn matches_sql(kind: SubjectKind) -> String {
        format!(
            "SELECT m.{column} AS subject_id, \
             MIN(LOWER(m.metadata_value)) AS sort_value, \
             MAX(s.{start}) AS started \
             FROM {table} m \
             JOIN metadata.metadata_key k ON k.metadata_key_id = m.metadata_key_id \
             JOIN {subjects} s ON s.{column} = m.{column}{visible} \
             WHERE m.metadata_value ILIKE $1 AND k.name = ANY($2) AND {active} \
             GROUP BY m.{column}",
            column = kind.subject_column(),
            start = kind.start_column(),
            table = kind.metadata_table(Strand::Text),
            subjects = kind.subject_table(),
            visible = Self::visible_sql(kind),
            active = active_on("m", "$3"),
        )
    }
}

#[async_trait]
impl MetadataRepository for PostgresMetadataRepository {
    async fn fetch(
        &self,
        kind: SubjectKind,
        strand: Strand,
        subject_ids: &[i32],
        keys: &[String],
        at: DateTime<Utc>,
    ) -> Result<Vec<MetadataRow>, DomainError> {
        if subject_ids.is_empty() || keys.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT subject_id, key, value, cache_duration FROM ({}) sources \
             ORDER BY subject_id ASC, key ASC, priority ASC, effective_from DESC",
            Self::sources_sql(kind, strand)
        );
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            sql,
            [subject_ids.to_vec().into(), keys.to_vec().into(), at.into()],
        );

        let rows = MetadataQueryRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| MetadataRow {
                subject_id: row.subject_id,
                key: row.key,
                value: row.value,
                cache_duration: row.cache_duration,
            })
            .collect())
    }

    async fn search(
        &self,
        kind: SubjectKind,
        term: &str,
        keys: &[String],
        order: SearchOrder,
        at: DateTime<Utc>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<i32>, DomainError> {
        let order_by = match order {
            SearchOrder::Alpha => "sort_value ASC, subject_id ASC",
            SearchOrder::Recent => "started DESC NULLS LAST, subject_id DESC",
        };
        let sql = format!(
            "SELECT subject_id FROM ({}) matches ORDER BY {} LIMIT $4 OFFSET $5",
            Self::matches_sql(kind),
            order_by
        );
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            sql,
            [
                contains_pattern(term).into(),
                keys.to_vec().into(),
                at.into(),
                (limit as i64).into(),
                (offset as i64).into(),
            ],
        );

        let rows = SubjectIdRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|row| row.subject_id).collect())
    }

    async fn count_search(
        &self,
        kind: SubjectKind,
        term: &str,
        keys: &[String],
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let sql = format!(
            "SELECT COUNT(*) AS count FROM ({}) matches",
            Self::matches_sql(kind)
        );
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            sql,
            [contains_pattern(term).into(), keys.to_vec().into(), at.into()],
        );

        let count = CountRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .map_or(0, |row| row.count);

        Ok(count.max(0) as u64)
    }

    async fn searchable_keys(&self) -> Result<Vec<MetadataKey>, DomainError> {
        let results = metadata_key::Entity::find()
            .filter(metadata_key::Column::Searchable.eq(true))
            .order_by_asc(metadata_key::Column::Plural)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

impl From<metadata_key::Model> for MetadataKey {
    fn from(model: metadata_key::Model) -> Self {
        MetadataKey {
            id: model.metadata_key_id,
            name: model.name,
            description: model.description,
            allow_multiple: model.allow_multiple.unwrap_or(false),
            cache_duration: model.cache_duration.unwrap_or(300),
            searchable: model.searchable,
            plural: model.plural,
        }
    }
}
