//! Mention Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Mention, MentionRepository, NewMention};
use crate::shared::error::AppError;

const MENTION_COLUMNS: &str =
    "id, tenant_id, room_id, message_id, mentioned_user_id, created_at, read_at";

/// PostgreSQL mention repository implementation.
pub struct PgMentionRepository {
    pool: PgPool,
}

impl PgMentionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MentionRow {
    id: Uuid,
    tenant_id: i64,
    room_id: Uuid,
    message_id: Uuid,
    mentioned_user_id: i64,
    created_at: DateTime<Utc>,
    read_at: Option<DateTime<Utc>>,
}

impl From<MentionRow> for Mention {
    fn from(row: MentionRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            room_id: row.room_id,
            message_id: row.message_id,
            mentioned_user_id: row.mentioned_user_id,
            created_at: row.created_at,
            read_at: row.read_at,
        }
    }
}

#[async_trait]
impl MentionRepository for PgMentionRepository {
    /// Insert unless `(message_id, mentioned_user_id)` is already recorded.
    async fn create(&self, mention: &NewMention) -> Result<Option<Mention>, AppError> {
        let row = sqlx::query_as::<_, MentionRow>(&format!(
            r#"
            INSERT INTO chat_mentions (id, tenant_id, room_id, message_id, mentioned_user_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (message_id, mentioned_user_id) DO NOTHING
            RETURNING {MENTION_COLUMNS}
            "#
        ))
        .bind(mention.id)
        .bind(mention.tenant_id)
        .bind(mention.room_id)
        .bind(mention.message_id)
        .bind(mention.mentioned_user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Mention::from))
    }

    async fn list_for_user(
        &self,
        tenant_id: i64,
        user_id: i64,
        unread_only: bool,
    ) -> Result<Vec<Mention>, AppError> {
        let rows = sqlx::query_as::<_, MentionRow>(&format!(
            r#"
            SELECT {MENTION_COLUMNS}
            FROM chat_mentions
            WHERE tenant_id = $1
              AND mentioned_user_id = $2
              AND (NOT $3 OR read_at IS NULL)
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(tenant_id)
        .bind(user_id)
        .bind(unread_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Mention::from).collect())
    }

    /// Keeps the first `read_at` on repeated calls.
    async fn mark_read(
        &self,
        tenant_id: i64,
        mention_id: Uuid,
        user_id: i64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE chat_mentions
            SET read_at = COALESCE(read_at, NOW())
            WHERE id = $1 AND tenant_id = $2 AND mentioned_user_id = $3
            "#,
        )
        .bind(mention_id)
        .bind(tenant_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
