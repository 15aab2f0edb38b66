//! Unread Tracker
//!
//! Per-member read cursors and the unread counts derived from them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::ChatError;
use crate::domain::{Membership, MessageRepository, RoomRepository};

pub struct UnreadTracker {
    rooms: Arc<dyn RoomRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl UnreadTracker {
    pub fn new(rooms: Arc<dyn RoomRepository>, messages: Arc<dyn MessageRepository>) -> Self {
        Self { rooms, messages }
    }

    /// Non-deleted messages from others created after the member's cursor.
    pub async fn unread_count(&self, membership: &Membership) -> Result<i64, ChatError> {
        let count = self
            .messages
            .count_unread(membership.room_id, membership.user_id, membership.last_read_at)
            .await?;
        Ok(count)
    }

    /// Move the member's cursor to the store's current time.
    pub async fn mark_read(&self, room_id: Uuid, user_id: i64) -> Result<DateTime<Utc>, ChatError> {
        self.rooms
            .mark_read(room_id, user_id)
            .await?
            .ok_or(ChatError::AccessDenied)
    }
}
