//! Response DTOs
//!
//! Data structures for API response bodies. Room, message and mention ids
//! are UUID strings; user ids stay numeric.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::application::services::{
    CreatedRoomDto, MessageDto, MessagePageDto, RoomDto, RoomSummaryDto,
};
use crate::domain::{Membership, Mention, Message, Quote, Room};

/// RFC 3339 in UTC with a `Z` suffix, so `next_cursor` can be sent back in
/// a query string unescaped.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Room response
#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub id: String,
    pub kind: String,
    pub name: Option<String>,
    pub created_by: i64,
    pub created_at: String,
    pub updated_at: String,
    pub members: Vec<MemberResponse>,
}

impl RoomResponse {
    fn from_parts(room: Room, members: Vec<Membership>) -> Self {
        Self {
            id: room.id.to_string(),
            kind: room.kind.as_str().to_string(),
            name: room.name,
            created_by: room.created_by,
            created_at: timestamp(room.created_at),
            updated_at: timestamp(room.updated_at),
            members: members.into_iter().map(MemberResponse::from).collect(),
        }
    }
}

impl From<RoomDto> for RoomResponse {
    fn from(dto: RoomDto) -> Self {
        Self::from_parts(dto.room, dto.members)
    }
}

/// Create room response
#[derive(Debug, Serialize)]
pub struct CreatedRoomResponse {
    #[serde(flatten)]
    pub room: RoomResponse,
    pub created: bool,
}

impl From<CreatedRoomDto> for CreatedRoomResponse {
    fn from(dto: CreatedRoomDto) -> Self {
        Self {
            room: dto.room.into(),
            created: dto.created,
        }
    }
}

/// Room list entry
#[derive(Debug, Serialize)]
pub struct RoomSummaryResponse {
    #[serde(flatten)]
    pub room: RoomResponse,
    pub last_message: Option<MessageResponse>,
    pub last_message_at: Option<String>,
    pub unread_count: i64,
}

impl From<RoomSummaryDto> for RoomSummaryResponse {
    fn from(dto: RoomSummaryDto) -> Self {
        let last_message_at = dto.last_message.as_ref().map(|m| timestamp(m.created_at));
        Self {
            room: RoomResponse::from_parts(dto.room, dto.members),
            last_message: dto.last_message.map(|m| MessageResponse::from_parts(m, None)),
            last_message_at,
            unread_count: dto.unread_count,
        }
    }
}

/// Membership response
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub user_id: i64,
    pub role: String,
    pub last_read_at: Option<String>,
    pub joined_at: String,
}

impl From<Membership> for MemberResponse {
    fn from(membership: Membership) -> Self {
        Self {
            user_id: membership.user_id,
            role: membership.role.as_str().to_string(),
            last_read_at: membership.last_read_at.map(timestamp),
            joined_at: timestamp(membership.created_at),
        }
    }
}

/// Message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub room_id: String,
    pub sender_id: i64,
    pub content: String,
    pub kind: String,
    pub created_at: String,
    pub edited_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<QuoteResponse>,
}

impl MessageResponse {
    fn from_parts(message: Message, quote: Option<Quote>) -> Self {
        Self {
            id: message.id.to_string(),
            room_id: message.room_id.to_string(),
            sender_id: message.sender_id,
            content: message.content,
            kind: message.kind.as_str().to_string(),
            created_at: timestamp(message.created_at),
            edited_at: message.edited_at.map(timestamp),
            deleted_at: message.deleted_at.map(timestamp),
            quote: quote.map(QuoteResponse::from),
        }
    }
}

impl From<MessageDto> for MessageResponse {
    fn from(dto: MessageDto) -> Self {
        Self::from_parts(dto.message, dto.quote)
    }
}

/// Timeline page
#[derive(Debug, Serialize)]
pub struct MessagePageResponse {
    pub messages: Vec<MessageResponse>,
    pub next_cursor: Option<String>,
}

impl From<MessagePageDto> for MessagePageResponse {
    fn from(dto: MessagePageDto) -> Self {
        Self {
            messages: dto.messages.into_iter().map(MessageResponse::from).collect(),
            next_cursor: dto.next_cursor.map(timestamp),
        }
    }
}

/// Quote response
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub id: String,
    pub message_id: String,
    pub external_account_ref: i64,
    pub external_conversation_ref: i64,
    pub external_message_ref: i64,
    pub snapshot: Value,
    pub created_at: String,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        Self {
            id: quote.id.to_string(),
            message_id: quote.message_id.to_string(),
            external_account_ref: quote.external_account_ref,
            external_conversation_ref: quote.external_conversation_ref,
            external_message_ref: quote.external_message_ref,
            snapshot: quote.snapshot_blob,
            created_at: timestamp(quote.created_at),
        }
    }
}

/// Mention inbox entry
#[derive(Debug, Serialize)]
pub struct MentionResponse {
    pub id: String,
    pub room_id: String,
    pub message_id: String,
    pub mentioned_user_id: i64,
    pub created_at: String,
    pub read_at: Option<String>,
}

impl From<Mention> for MentionResponse {
    fn from(mention: Mention) -> Self {
        Self {
            id: mention.id.to_string(),
            room_id: mention.room_id.to_string(),
            message_id: mention.message_id.to_string(),
            mentioned_user_id: mention.mentioned_user_id,
            created_at: timestamp(mention.created_at),
            read_at: mention.read_at.map(timestamp),
        }
    }
}

/// Read cursor after mark-read
#[derive(Debug, Serialize)]
pub struct ReadCursorResponse {
    pub room_id: String,
    pub last_read_at: String,
}

/// Unread count
#[derive(Debug, Serialize)]
pub struct UnreadResponse {
    pub room_id: String,
    pub unread_count: i64,
}
