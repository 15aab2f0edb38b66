//! Quote Linker
//!
//! Attaches a snapshot of an external CRM conversation to a chat message.
//! Both upstream calls must succeed before anything is stored.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use uuid::Uuid;

use super::error::ChatError;
use crate::domain::{ConversationError, ConversationService, NewQuote, Quote, QuoteRepository};

/// External references of the conversation message being quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteRequestDto {
    pub external_account_ref: i64,
    pub external_conversation_ref: i64,
    pub external_message_ref: i64,
}

pub struct QuoteLinker {
    quotes: Arc<dyn QuoteRepository>,
    conversations: Option<Arc<dyn ConversationService>>,
    timeout: Duration,
}

impl QuoteLinker {
    pub fn new(
        quotes: Arc<dyn QuoteRepository>,
        conversations: Option<Arc<dyn ConversationService>>,
        timeout: Duration,
    ) -> Self {
        Self {
            quotes,
            conversations,
            timeout,
        }
    }

    /// Fetch the conversation and its messages, then persist the quote.
    pub async fn attach(
        &self,
        tenant_id: i64,
        message_id: Uuid,
        request: QuoteRequestDto,
    ) -> Result<Quote, ChatError> {
        let client = self
            .conversations
            .as_ref()
            .ok_or(ConversationError::NotConfigured)?;

        let account = request.external_account_ref;
        let conversation_ref = request.external_conversation_ref;

        let fetch = async {
            let conversation = client.get_conversation(account, conversation_ref).await?;
            let messages = client
                .get_conversation_messages(account, conversation_ref)
                .await?;
            Ok::<_, ConversationError>((conversation, messages))
        };

        let (conversation, messages) = match tokio::time::timeout(self.timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(ConversationError::Timeout),
        }
        .map_err(|e| {
            tracing::warn!(
                tenant_id,
                %message_id,
                account_ref = account,
                conversation_ref,
                error = %e,
                "conversation fetch failed"
            );
            e
        })?;

        let quote = NewQuote {
            id: Uuid::now_v7(),
            tenant_id,
            message_id,
            external_account_ref: account,
            external_conversation_ref: conversation_ref,
            external_message_ref: request.external_message_ref,
            snapshot_blob: json!({
                "conversation": conversation,
                "messages": messages,
                "target_message_id": request.external_message_ref,
            }),
        };

        let quote = self.quotes.create(&quote).await?;
        tracing::info!(tenant_id, %message_id, quote_id = %quote.id, "quote attached");
        Ok(quote)
    }
}
