//! Mention entity and repository trait.
//!
//! Maps to the `chat_mentions` table. At most one row exists per
//! `(message_id, mentioned_user_id)`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub id: Uuid,
    pub tenant_id: i64,
    pub room_id: Uuid,
    pub message_id: Uuid,
    pub mentioned_user_id: i64,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewMention {
    pub id: Uuid,
    pub tenant_id: i64,
    pub room_id: Uuid,
    pub message_id: Uuid,
    pub mentioned_user_id: i64,
}

/// Repository trait for the mention inbox.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MentionRepository: Send + Sync {
    /// Record a mention. Returns `None` if one already exists for the
    /// same message and user.
    async fn create(&self, mention: &NewMention) -> Result<Option<Mention>, AppError>;

    /// Mentions addressed to a user, newest first.
    async fn list_for_user(
        &self,
        tenant_id: i64,
        user_id: i64,
        unread_only: bool,
    ) -> Result<Vec<Mention>, AppError>;

    /// Mark a mention addressed to `user_id` as read, keeping the first
    /// `read_at`. Returns `false` if no such mention exists.
    async fn mark_read(
        &self,
        tenant_id: i64,
        mention_id: Uuid,
        user_id: i64,
    ) -> Result<bool, AppError>;
}
