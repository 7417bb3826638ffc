//! PostgreSQL adapter for MessageRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::domain::entities::NewMessage;
use crate::domain::ports::MessageRepository;
use crate::entity::messages;
use crate::error::DomainError;

/// PostgreSQL implementation of MessageRepository
pub struct PostgresMessageRepository {
    db: DatabaseConnection,
}

impl PostgresMessageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn create(&self, message: &NewMessage) -> Result<(), DomainError> {
        let model = messages::ActiveModel {
            commtypeid: Set(message.comm_type),
            sender: Set(message.sender.clone()),
            timeslotid: Set(message.timeslot_id),
            subject: Set(message.subject.clone()),
            content: Set(message.content.clone()),
            date: Set(message.sent_at.fixed_offset()),
            statusid: Set(message.status),
            comm_source: Set(message.source.clone()),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}
