//! External conversation service contract.
//!
//! The CRM conversation service is the source of quote snapshots. Its
//! payloads are opaque and passed through unchanged.

use async_trait::async_trait;
use serde_json::Value;

/// Errors from the external conversation service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversationError {
    #[error("Conversation {0} not found")]
    NotFound(i64),

    #[error("Conversation service returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Conversation service request failed: {0}")]
    Transport(String),

    #[error("Conversation service timed out")]
    Timeout,

    #[error("Conversation service is not configured")]
    NotConfigured,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationService: Send + Sync {
    /// Fetch one conversation of an external account.
    async fn get_conversation(
        &self,
        account_ref: i64,
        conversation_ref: i64,
    ) -> Result<Value, ConversationError>;

    /// Fetch the messages of that conversation.
    async fn get_conversation_messages(
        &self,
        account_ref: i64,
        conversation_ref: i64,
    ) -> Result<Value, ConversationError>;
}
