//! HTTP client for the external CRM conversation service.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::ConversationSettings;
use crate::domain::{ConversationError, ConversationService};

/// Conversation API client authenticated with an `api_access_token` header.
pub struct HttpConversationClient {
    base_url: String,
    api_token: String,
    client: reqwest::Client,
}

impl HttpConversationClient {
    pub fn new(settings: &ConversationSettings) -> Result<Self, ConversationError> {
        if !settings.is_enabled() {
            return Err(ConversationError::NotConfigured);
        }

        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ConversationError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_token: settings.api_token.clone(),
            client,
        })
    }

    fn conversation_url(&self, account_ref: i64, conversation_ref: i64) -> String {
        format!(
            "{}/api/v1/accounts/{}/conversations/{}",
            self.base_url, account_ref, conversation_ref
        )
    }

    async fn get_json(&self, url: &str, conversation_ref: i64) -> Result<Value, ConversationError> {
        let response = self
            .client
            .get(url)
            .header("api_access_token", &self.api_token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ConversationError::Timeout
                } else {
                    ConversationError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ConversationError::NotFound(conversation_ref));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConversationError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ConversationError::Transport(format!("invalid response body: {}", e)))
    }
}

#[async_trait]
impl ConversationService for HttpConversationClient {
    async fn get_conversation(
        &self,
        account_ref: i64,
        conversation_ref: i64,
    ) -> Result<Value, ConversationError> {
        let url = self.conversation_url(account_ref, conversation_ref);
        self.get_json(&url, conversation_ref).await
    }

    async fn get_conversation_messages(
        &self,
        account_ref: i64,
        conversation_ref: i64,
    ) -> Result<Value, ConversationError> {
        let url = format!(
            "{}/messages",
            self.conversation_url(account_ref, conversation_ref)
        );
        self.get_json(&url, conversation_ref).await
    }
}
