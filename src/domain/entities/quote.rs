//! Quote entity and repository trait.
//!
//! Maps to the `chat_quotes` table: an immutable snapshot of an external
//! conversation attached to one chat message.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::shared::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,
    pub tenant_id: i64,
    /// Unique: one quote per message
    pub message_id: Uuid,
    pub external_account_ref: i64,
    pub external_conversation_ref: i64,
    pub external_message_ref: i64,
    /// `{"conversation", "messages", "target_message_id"}`
    pub snapshot_blob: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewQuote {
    pub id: Uuid,
    pub tenant_id: i64,
    pub message_id: Uuid,
    pub external_account_ref: i64,
    pub external_conversation_ref: i64,
    pub external_message_ref: i64,
    pub snapshot_blob: Value,
}

/// Repository trait for quotes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Persist a quote. Fails with `Conflict` if the message already has one.
    async fn create(&self, quote: &NewQuote) -> Result<Quote, AppError>;

    /// Quotes for a batch of messages, keyed by message id.
    async fn find_by_message_ids(
        &self,
        message_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Quote>, AppError>;
}
