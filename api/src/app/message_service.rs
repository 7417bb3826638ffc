//! Listener messages
//!
//! Messages sent from the website go to whichever show is on air, after a
//! rudimentary spam check. Messages mentioning sensitive topics get a
//! warning for the presenter attached.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::MessageConfig;
use crate::domain::entities::{NewMessage, ScheduleSlot, UNREAD_STATUS, WEBSITE_COMM_TYPE};
use crate::domain::ports::MessageRepository;
use crate::error::AppError;

/// Sender recorded against website messages
pub const WEBSITE_SENDER: &str = "URY Website";

/// Longest subject line the message table holds
pub const SUBJECT_LENGTH: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageOutcome {
    /// Nothing on air that can take messages
    NoMsg,
    Spam,
    Sent,
}

impl MessageOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageOutcome::NoMsg => "no_msg",
            MessageOutcome::Spam => "spam",
            MessageOutcome::Sent => "sent",
        }
    }
}

/// Whether a message trips any spam filter
pub fn is_spam(message: &str, config: &MessageConfig) -> bool {
    let lowered = message.to_lowercase();
    config
        .spam
        .iter()
        .any(|spam| lowered.contains(&spam.to_lowercase()))
}

/// The message body with any triggered warnings prepended
pub fn with_warnings(message: &str, config: &MessageConfig) -> String {
    let lowered = message.to_lowercase();
    let mut body: String = config
        .warns
        .iter()
        .filter(|warn| {
            warn.triggers
                .iter()
                .any(|trigger| lowered.contains(&trigger.to_lowercase()))
        })
        .map(|warn| {
            format!(
                "<div class=\"ui-state-highlight\"><span>{}</span></div>",
                warn.messages
            )
        })
        .collect();

    body.push_str(message);
    body
}

pub struct MessageService<MR>
where
    MR: MessageRepository,
{
    messages: Arc<MR>,
    config: MessageConfig,
}

impl<MR> MessageService<MR>
where
    MR: MessageRepository,
{
    pub fn new(messages: Arc<MR>, config: MessageConfig) -> Self {
        Self { messages, config }
    }

    /// Send `comments` to the slot currently on air
    pub async fn send(
        &self,
        on_air: Option<&ScheduleSlot>,
        comments: &str,
        source: &str,
        now: DateTime<Utc>,
    ) -> Result<MessageOutcome, AppError> {
        if comments.trim().is_empty() {
            return Err(AppError::BadRequest("comments must not be empty".to_string()));
        }

        let Some((slot, timeslot_id)) =
            on_air.and_then(|slot| slot.timeslot_id.map(|id| (slot, id)))
        else {
            return Ok(MessageOutcome::NoMsg);
        };
        if !slot.can_be_messaged {
            return Ok(MessageOutcome::NoMsg);
        }

        if is_spam(comments, &self.config) {
            tracing::info!("Rejected spam message from {}", source);
            return Ok(MessageOutcome::Spam);
        }

        let content = with_warnings(comments, &self.config);
        let message = NewMessage {
            comm_type: WEBSITE_COMM_TYPE,
            sender: WEBSITE_SENDER.to_string(),
            timeslot_id: timeslot_id.0,
            subject: content.chars().take(SUBJECT_LENGTH).collect(),
            content,
            sent_at: now,
            status: UNREAD_STATUS,
            source: source.to_string(),
        };

        self.messages.create(&message).await?;
        tracing::info!("Message from {} sent to timeslot {}", source, timeslot_id);

        Ok(MessageOutcome::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{slot_at, test_message_config, utc, InMemoryMessageRepository};

    fn service(repo: Arc<InMemoryMessageRepository>) -> MessageService<InMemoryMessageRepository> {
        MessageService::new(repo, test_message_config())
    }

    #[test]
    fn spam_matches_case_insensitively() {
        let config = test_message_config();

        assert!(is_spam("Buy VIAGRA now", &config));
        assert!(is_spam("Cheap Watches!", &config));
        assert!(!is_spam("Play some Beatles", &config));
    }

    #[test]
    fn warnings_come_before_the_message() {
        let config = test_message_config();

        let body = with_warnings("What's your PASSWORD?", &config);

        assert_eq!(
            body,
            "<div class=\"ui-state-highlight\"><span>Never give out personal details on air.\
             </span></div>What's your PASSWORD?"
        );
        assert_eq!(with_warnings("Hello", &config), "Hello");
    }

    #[tokio::test]
    async fn message_is_stored_against_the_current_timeslot() {
        let repo = Arc::new(InMemoryMessageRepository::new());
        let slot = slot_at(7, utc(2014, 1, 6, 9, 0), 1);
        let now = utc(2014, 1, 6, 9, 30);

        let outcome = service(repo.clone())
            .send(Some(&slot), "Play some Beatles", "10.0.0.1", now)
            .await
            .unwrap();

        assert_eq!(outcome, MessageOutcome::Sent);
        let stored = repo.messages();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].timeslot_id, 7);
        assert_eq!(stored[0].comm_type, 3);
        assert_eq!(stored[0].status, 1);
        assert_eq!(stored[0].sender, "URY Website");
        assert_eq!(stored[0].source, "10.0.0.1");
        assert_eq!(stored[0].sent_at, now);
    }

    #[tokio::test]
    async fn long_messages_get_a_truncated_subject() {
        let repo = Arc::new(InMemoryMessageRepository::new());
        let slot = slot_at(7, utc(2014, 1, 6, 9, 0), 1);
        let long = "a".repeat(300);

        service(repo.clone())
            .send(Some(&slot), &long, "10.0.0.1", utc(2014, 1, 6, 9, 30))
            .await
            .unwrap();

        let stored = repo.messages();
        assert_eq!(stored[0].subject.len(), 255);
        assert_eq!(stored[0].content.len(), 300);
    }

    #[tokio::test]
    async fn unmessageable_slots_get_no_message() {
        let repo = Arc::new(InMemoryMessageRepository::new());
        let mut slot = slot_at(7, utc(2014, 1, 6, 9, 0), 1);
        slot.can_be_messaged = false;
        let now = utc(2014, 1, 6, 9, 30);

        let nothing_on = service(repo.clone())
            .send(None, "Hello", "10.0.0.1", now)
            .await
            .unwrap();
        let unmessageable = service(repo.clone())
            .send(Some(&slot), "Hello", "10.0.0.1", now)
            .await
            .unwrap();

        assert_eq!(nothing_on, MessageOutcome::NoMsg);
        assert_eq!(unmessageable, MessageOutcome::NoMsg);
        assert!(repo.messages().is_empty());
    }

    #[tokio::test]
    async fn spam_is_not_stored() {
        let repo = Arc::new(InMemoryMessageRepository::new());
        let slot = slot_at(7, utc(2014, 1, 6, 9, 0), 1);

        let outcome = service(repo.clone())
            .send(Some(&slot), "cheap watches here", "10.0.0.1", utc(2014, 1, 6, 9, 30))
            .await
            .unwrap();

        assert_eq!(outcome, MessageOutcome::Spam);
        assert!(repo.messages().is_empty());
    }

    #[tokio::test]
    async fn empty_comments_are_rejected() {
        let repo = Arc::new(InMemoryMessageRepository::new());

        let result = service(repo)
            .send(None, "   ", "10.0.0.1", utc(2014, 1, 6, 9, 30))
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
