//! PostgreSQL adapter for CreditRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, FromQueryResult, Statement};

use crate::domain::entities::{Credit, CreditRow, SubjectKind};
use super::active_on;
use crate::domain::ports::CreditRepository;
use crate::error::DomainError;

#[derive(Debug, FromQueryResult)]
struct CreditQueryRow {
    subject_id: i32,
    type_name: String,
    first_name: Option<String>,
    last_name: Option<String>,
    plural: String,
    is_in_byline: bool,
}

/// PostgreSQL implementation of CreditRepository
pub struct PostgresCreditRepository {
    db: DatabaseConnection,
}

impl PostgresCreditRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CreditRepository for PostgresCreditRepository {
    async fn fetch(
        &self,
        kind: SubjectKind,
        subject_ids: &[i32],
        at: DateTime<Utc>,
        types: &[String],
    ) -> Result<Vec<CreditRow>, DomainError> {
        let table = kind
            .credit_table()
            .ok_or_else(|| DomainError::Validation(format!("{:?} has no credits", kind)))?;
        if subject_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT c.{column} AS subject_id, ct.name AS type_name, \
             p.fname AS first_name, p.sname AS last_name, \
             ct.plural AS plural, ct.is_in_byline AS is_in_byline \
             FROM {table} c \
             JOIN people.credit_type ct ON ct.credit_type_id = c.credit_type_id \
             JOIN public.member p ON p.memberid = c.creditid \
             WHERE c.{column} = ANY($1) \
             AND (cardinality($3::text[]) = 0 OR ct.name = ANY($3)) \
             AND {active} \
             ORDER BY c.{column} ASC, ct.name ASC, p.sname ASC, p.fname ASC",
            column = kind.subject_column(),
            table = table,
            active = active_on("c", "$2"),
        );
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            sql,
            [subject_ids.to_vec().into(), at.into(), types.to_vec().into()],
        );

        let rows = CreditQueryRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| CreditRow {
                subject_id: row.subject_id,
                credit: Credit {
                    type_name: row.type_name,
                    first_name: row.first_name.unwrap_or_default(),
                    last_name: row.last_name.unwrap_or_default(),
                    plural: row.plural,
                    is_in_byline: row.is_in_byline,
                },
            })
            .collect())
    }
}
