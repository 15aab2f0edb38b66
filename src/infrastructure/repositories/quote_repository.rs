//! Quote Repository Implementation

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{NewQuote, Quote, QuoteRepository};
use crate::shared::error::{conflict_on_unique, AppError};

const QUOTE_COLUMNS: &str = "id, tenant_id, message_id, external_account_ref, \
    external_conversation_ref, external_message_ref, snapshot_blob, created_at";

/// PostgreSQL quote repository implementation.
pub struct PgQuoteRepository {
    pool: PgPool,
}

impl PgQuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QuoteRow {
    id: Uuid,
    tenant_id: i64,
    message_id: Uuid,
    external_account_ref: i64,
    external_conversation_ref: i64,
    external_message_ref: i64,
    snapshot_blob: Value,
    created_at: DateTime<Utc>,
}

impl From<QuoteRow> for Quote {
    fn from(row: QuoteRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            message_id: row.message_id,
            external_account_ref: row.external_account_ref,
            external_conversation_ref: row.external_conversation_ref,
            external_message_ref: row.external_message_ref,
            snapshot_blob: row.snapshot_blob,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl QuoteRepository for PgQuoteRepository {
    async fn create(&self, quote: &NewQuote) -> Result<Quote, AppError> {
        let row = sqlx::query_as::<_, QuoteRow>(&format!(
            r#"
            INSERT INTO chat_quotes (id, tenant_id, message_id, external_account_ref,
                                     external_conversation_ref, external_message_ref, snapshot_blob)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {QUOTE_COLUMNS}
            "#
        ))
        .bind(quote.id)
        .bind(quote.tenant_id)
        .bind(quote.message_id)
        .bind(quote.external_account_ref)
        .bind(quote.external_conversation_ref)
        .bind(quote.external_message_ref)
        .bind(&quote.snapshot_blob)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Message already has a quote"))?;

        Ok(row.into())
    }

    async fn find_by_message_ids(
        &self,
        message_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Quote>, AppError> {
        if message_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, QuoteRow>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM chat_quotes WHERE message_id = ANY($1)"
        ))
        .bind(message_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.message_id, Quote::from(row)))
            .collect())
    }
}
