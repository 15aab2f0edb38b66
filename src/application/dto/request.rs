//! Request DTOs
//!
//! Data structures for API request bodies and query strings.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::application::services::{
    AddMemberDto, CreateRoomDto, MessageQueryDto, QuoteRequestDto, SendMessageDto,
};

/// Create room request. Name length is checked against `chat.max_room_name_length`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 16, message = "Kind must be 'dm' or 'group'"))]
    pub kind: String,

    pub name: Option<String>,

    #[serde(default)]
    #[validate(length(max = 500, message = "At most 500 members per request"))]
    pub member_ids: Vec<i64>,
}

impl From<CreateRoomRequest> for CreateRoomDto {
    fn from(request: CreateRoomRequest) -> Self {
        Self {
            kind: request.kind,
            name: request.name,
            member_ids: request.member_ids,
        }
    }
}

/// Add member request
#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    #[validate(range(min = 1, message = "Invalid user id"))]
    pub user_id: i64,

    pub role: Option<String>,
}

impl From<AddMemberRequest> for AddMemberDto {
    fn from(request: AddMemberRequest) -> Self {
        Self {
            user_id: request.user_id,
            role: request.role,
        }
    }
}

/// Quote reference, used on its own and inside a send request
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct CreateQuoteRequest {
    #[validate(range(min = 1, message = "Invalid account reference"))]
    pub external_account_ref: i64,

    #[validate(range(min = 1, message = "Invalid conversation reference"))]
    pub external_conversation_ref: i64,

    #[validate(range(min = 1, message = "Invalid message reference"))]
    pub external_message_ref: i64,
}

impl From<CreateQuoteRequest> for QuoteRequestDto {
    fn from(request: CreateQuoteRequest) -> Self {
        Self {
            external_account_ref: request.external_account_ref,
            external_conversation_ref: request.external_conversation_ref,
            external_message_ref: request.external_message_ref,
        }
    }
}

/// Send message request. The upper bound is `chat.max_content_length`,
/// enforced by the chat service.
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,

    pub kind: Option<String>,

    #[validate(nested)]
    pub quote: Option<CreateQuoteRequest>,
}

impl From<SendMessageRequest> for SendMessageDto {
    fn from(request: SendMessageRequest) -> Self {
        Self {
            content: request.content,
            kind: request.kind,
            quote: request.quote.map(Into::into),
        }
    }
}

/// Timeline query: `?limit=50&cursor=2026-01-01T00:00:00Z`
#[derive(Debug, Default, Deserialize)]
pub struct MessageListQuery {
    pub limit: Option<u32>,
    pub cursor: Option<DateTime<Utc>>,
}

impl From<MessageListQuery> for MessageQueryDto {
    fn from(query: MessageListQuery) -> Self {
        Self {
            limit: query.limit,
            before: query.cursor,
        }
    }
}

/// Mention inbox query
#[derive(Debug, Default, Deserialize)]
pub struct MentionQuery {
    #[serde(default)]
    pub unread_only: bool,
}
