//! Message entity and repository trait.
//!
//! Maps to the `chat_messages` table. Messages are immutable after
//! creation except for `deleted_at`, which is set once and never cleared.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// Message kinds matching the `chat_messages.kind` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// A regular user message
    #[default]
    Text,
    /// Generated by the platform
    System,
    /// A message flagged as a mention
    Mention,
}

impl MessageKind {
    /// Convert from database string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "system" => Some(Self::System),
            "mention" => Some(Self::Mention),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::System => "system",
            Self::Mention => "mention",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a message in a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// UUIDv7, so ids sort with creation time
    pub id: Uuid,
    pub room_id: Uuid,
    pub tenant_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Check if this message has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Input for appending a message; `created_at` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub id: Uuid,
    pub room_id: Uuid,
    pub tenant_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub kind: MessageKind,
}

/// Repository trait for the message timeline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Insert a message. The store assigns `created_at`.
    async fn append(&self, message: &NewMessage) -> Result<Message, AppError>;

    /// Newest-first page of non-deleted messages with `created_at < before`.
    ///
    /// Ties on `created_at` are broken by id, so the order is stable.
    async fn list(
        &self,
        room_id: Uuid,
        limit: i64,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Message>, AppError>;

    /// Find a message within a tenant, including soft-deleted ones.
    async fn find_by_id(&self, tenant_id: i64, message_id: Uuid)
        -> Result<Option<Message>, AppError>;

    /// Set `deleted_at` if not already set.
    ///
    /// Returns `true` only when this call performed the deletion.
    async fn soft_delete(&self, message_id: Uuid) -> Result<bool, AppError>;

    /// The most recent non-deleted message of a room.
    async fn latest(&self, room_id: Uuid) -> Result<Option<Message>, AppError>;

    /// Count non-deleted messages not sent by `user_id` and newer than `since`
    /// (all of them when `since` is `None`).
    async fn count_unread(
        &self,
        room_id: Uuid,
        user_id: i64,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64, AppError>;
}
