//! Coach/client messaging: message types and the polling cursor.

use crate::coach::RecordId;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MAX_MESSAGE_CHARS: usize = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: RecordId,
    pub conversation_id: String,
    pub sender_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMessage {
    pub conversation_id: String,
    pub sender_id: String,
    pub body: String,
}

impl NewMessage {
    pub fn validate(&self) -> AppResult<()> {
        let body = self.body.trim();
        if body.is_empty() {
            return Err(AppError::Validation("Message cannot be empty.".into()));
        }
        if body.chars().count() > MAX_MESSAGE_CHARS {
            return Err(AppError::Validation(format!(
                "Messages are limited to {} characters.",
                MAX_MESSAGE_CHARS
            )));
        }
        if self.conversation_id.trim().is_empty() || self.sender_id.trim().is_empty() {
            return Err(AppError::Validation("Conversation and sender are required.".into()));
        }
        Ok(())
    }
}

/// Tracks what a poller has already delivered.
///
/// Polls ask for messages at or after the newest timestamp seen, so the
/// boundary message comes back every time; ids seen at that timestamp are
/// remembered to drop those repeats.
#[derive(Debug, Clone, Default)]
pub struct MessageCursor {
    last_seen: Option<DateTime<Utc>>,
    ids_at_last_seen: HashSet<RecordId>,
}

impl MessageCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.last_seen
    }

    /// Keep only messages not delivered before, in timestamp order, and
    /// advance the cursor past them.
    pub fn absorb(&mut self, mut batch: Vec<Message>) -> Vec<Message> {
        batch.sort_by_key(|m| m.created_at);

        let fresh: Vec<Message> = batch
            .into_iter()
            .filter(|m| match self.last_seen {
                None => true,
                Some(last) if m.created_at > last => true,
                Some(last) if m.created_at == last => !self.ids_at_last_seen.contains(&m.id),
                Some(_) => false,
            })
            .collect();

        for message in &fresh {
            match self.last_seen {
                Some(last) if message.created_at == last => {
                    self.ids_at_last_seen.insert(message.id.clone());
                }
                Some(last) if message.created_at < last => {}
                _ => {
                    self.last_seen = Some(message.created_at);
                    self.ids_at_last_seen.clear();
                    self.ids_at_last_seen.insert(message.id.clone());
                }
            }
        }

        fresh
    }
}
