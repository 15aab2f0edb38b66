//! Message Repository Implementation
//!
//! PostgreSQL implementation of the room timeline with `created_at`
//! watermark pagination and soft deletion.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Message, MessageKind, MessageRepository, NewMessage};
use crate::shared::error::AppError;

const MESSAGE_COLUMNS: &str =
    "id, room_id, tenant_id, sender_id, content, kind, created_at, edited_at, deleted_at";

/// PostgreSQL message repository implementation.
///
/// Timeline reads filter `deleted_at IS NULL`; only `find_by_id` surfaces
/// deleted rows.
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for `chat_messages`.
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    room_id: Uuid,
    tenant_id: i64,
    sender_id: i64,
    content: String,
    kind: String,
    created_at: DateTime<Utc>,
    edited_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

impl MessageRow {
    fn into_message(self) -> Result<Message, AppError> {
        let kind = MessageKind::parse(&self.kind)
            .ok_or_else(|| AppError::Internal(format!("Unknown message kind '{}'", self.kind)))?;
        Ok(Message {
            id: self.id,
            room_id: self.room_id,
            tenant_id: self.tenant_id,
            sender_id: self.sender_id,
            content: self.content,
            kind,
            created_at: self.created_at,
            edited_at: self.edited_at,
            deleted_at: self.deleted_at,
        })
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    /// Insert the message and move the room's `updated_at` to its timestamp.
    async fn append(&self, message: &NewMessage) -> Result<Message, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(&format!(
            r#"
            WITH inserted AS (
                INSERT INTO chat_messages (id, room_id, tenant_id, sender_id, content, kind)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING {MESSAGE_COLUMNS}
            ), touched AS (
                UPDATE chat_rooms SET updated_at = inserted.created_at
                FROM inserted
                WHERE chat_rooms.id = inserted.room_id
            )
            SELECT {MESSAGE_COLUMNS} FROM inserted
            "#
        ))
        .bind(message.id)
        .bind(message.room_id)
        .bind(message.tenant_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(message.kind.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.into_message()
    }

    /// Keyset page, newest first. UUIDv7 ids break timestamp ties.
    async fn list(
        &self,
        room_id: Uuid,
        limit: i64,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Message>, AppError> {
        let limit = limit.clamp(1, 100);

        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM chat_messages
            WHERE room_id = $1
              AND deleted_at IS NULL
              AND ($2::timestamptz IS NULL OR created_at < $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            "#
        ))
        .bind(room_id)
        .bind(before)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MessageRow::into_message).collect()
    }

    async fn find_by_id(
        &self,
        tenant_id: i64,
        message_id: Uuid,
    ) -> Result<Option<Message>, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM chat_messages WHERE id = $1 AND tenant_id = $2"
        ))
        .bind(message_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MessageRow::into_message).transpose()
    }

    async fn soft_delete(&self, message_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE chat_messages SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(message_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn latest(&self, room_id: Uuid) -> Result<Option<Message>, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM chat_messages
            WHERE room_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#
        ))
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MessageRow::into_message).transpose()
    }

    async fn count_unread(
        &self,
        room_id: Uuid,
        user_id: i64,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM chat_messages
            WHERE room_id = $1
              AND deleted_at IS NULL
              AND sender_id <> $2
              AND ($3::timestamptz IS NULL OR created_at > $3)
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
