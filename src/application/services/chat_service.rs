//! Chat Service
//!
//! The chat orchestrator. Every operation runs as a verified [`Caller`] and
//! applies, in order: tenant scoping (foreign ids are not found), the room
//! membership gate, then role rules. Best-effort side effects (mentions,
//! audit) run after the primary mutation has been stored.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use super::audit_recorder::AuditRecorder;
use super::error::ChatError;
use super::mention_resolver::MentionResolver;
use super::quote_linker::{QuoteLinker, QuoteRequestDto};
use super::unread_tracker::UnreadTracker;
use crate::config::ChatSettings;
use crate::domain::services::AccessPolicy;
use crate::domain::{
    AuditAction, AuditRepository, Caller, ConversationService, MemberRole, Membership, Mention,
    MentionRepository, Message, MessageKind, MessageRepository, NewMessage, NewRoom, Quote,
    QuoteRepository, Room, RoomKind, RoomRepository, UserDirectory,
};
use crate::shared::validation::{bounded_text, require_text};

/// Chat service trait
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Rooms the caller belongs to, with members, preview and unread count
    async fn list_rooms(&self, caller: Caller) -> Result<Vec<RoomSummaryDto>, ChatError>;

    /// Create a group room, or find-or-create a direct room
    async fn create_room(&self, caller: Caller, request: CreateRoomDto)
        -> Result<CreatedRoomDto, ChatError>;

    /// Get a room with its members
    async fn get_room(&self, caller: Caller, room_id: Uuid) -> Result<RoomDto, ChatError>;

    /// Add a member to a group room
    async fn add_member(
        &self,
        caller: Caller,
        room_id: Uuid,
        request: AddMemberDto,
    ) -> Result<Membership, ChatError>;

    /// Remove a member from a group room (or leave it)
    async fn remove_member(&self, caller: Caller, room_id: Uuid, user_id: i64)
        -> Result<(), ChatError>;

    /// Newest-first page of the room's timeline
    async fn list_messages(
        &self,
        caller: Caller,
        room_id: Uuid,
        query: MessageQueryDto,
    ) -> Result<MessagePageDto, ChatError>;

    /// Send a message, resolving mentions and attaching an optional quote
    async fn send_message(
        &self,
        caller: Caller,
        room_id: Uuid,
        request: SendMessageDto,
    ) -> Result<MessageDto, ChatError>;

    /// Get a message by id, including soft-deleted ones
    async fn get_message(&self, caller: Caller, message_id: Uuid) -> Result<MessageDto, ChatError>;

    /// Soft-delete a message
    async fn delete_message(&self, caller: Caller, message_id: Uuid) -> Result<(), ChatError>;

    /// Move the caller's read cursor to now
    async fn mark_room_read(&self, caller: Caller, room_id: Uuid)
        -> Result<DateTime<Utc>, ChatError>;

    /// Unread messages for the caller in a room
    async fn unread_count(&self, caller: Caller, room_id: Uuid) -> Result<i64, ChatError>;

    /// The caller's mention inbox
    async fn list_mentions(&self, caller: Caller, unread_only: bool)
        -> Result<Vec<Mention>, ChatError>;

    /// Mark one of the caller's mentions as read
    async fn mark_mention_read(&self, caller: Caller, mention_id: Uuid) -> Result<(), ChatError>;

    /// Attach a quote to an existing message
    async fn create_quote(
        &self,
        caller: Caller,
        message_id: Uuid,
        request: QuoteRequestDto,
    ) -> Result<Quote, ChatError>;
}

/// Create room request
#[derive(Debug, Clone)]
pub struct CreateRoomDto {
    pub kind: String,
    pub name: Option<String>,
    pub member_ids: Vec<i64>,
}

/// Add member request
#[derive(Debug, Clone)]
pub struct AddMemberDto {
    pub user_id: i64,
    pub role: Option<String>,
}

/// Send message request
#[derive(Debug, Clone)]
pub struct SendMessageDto {
    pub content: String,
    pub kind: Option<String>,
    pub quote: Option<QuoteRequestDto>,
}

/// Message query parameters
#[derive(Debug, Clone, Default)]
pub struct MessageQueryDto {
    pub limit: Option<u32>,
    pub before: Option<DateTime<Utc>>,
}

/// A room with its memberships
#[derive(Debug, Clone)]
pub struct RoomDto {
    pub room: Room,
    pub members: Vec<Membership>,
}

/// Result of room creation
#[derive(Debug, Clone)]
pub struct CreatedRoomDto {
    pub room: RoomDto,
    /// `false` when an existing direct room was returned
    pub created: bool,
}

/// Room list entry
#[derive(Debug, Clone)]
pub struct RoomSummaryDto {
    pub room: Room,
    pub members: Vec<Membership>,
    pub last_message: Option<Message>,
    pub unread_count: i64,
}

/// A message with its quote, if any
#[derive(Debug, Clone)]
pub struct MessageDto {
    pub message: Message,
    pub quote: Option<Quote>,
}

/// One page of a room timeline
#[derive(Debug, Clone)]
pub struct MessagePageDto {
    pub messages: Vec<MessageDto>,
    /// `created_at` of the oldest message on the page
    pub next_cursor: Option<DateTime<Utc>>,
}

/// The stores the orchestrator works against.
#[derive(Clone)]
pub struct ChatStores {
    pub rooms: Arc<dyn RoomRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub mentions: Arc<dyn MentionRepository>,
    pub quotes: Arc<dyn QuoteRepository>,
    pub audit: Arc<dyn AuditRepository>,
    pub directory: Arc<dyn UserDirectory>,
}

/// ChatService implementation
pub struct ChatServiceImpl {
    rooms: Arc<dyn RoomRepository>,
    messages: Arc<dyn MessageRepository>,
    mentions: Arc<dyn MentionRepository>,
    quotes: Arc<dyn QuoteRepository>,
    mention_resolver: MentionResolver,
    quote_linker: QuoteLinker,
    unread: UnreadTracker,
    audit: AuditRecorder,
    settings: ChatSettings,
}

impl ChatServiceImpl {
    pub fn new(
        stores: ChatStores,
        conversations: Option<Arc<dyn ConversationService>>,
        settings: ChatSettings,
        quote_timeout: Duration,
    ) -> Self {
        Self {
            mention_resolver: MentionResolver::new(stores.mentions.clone(), stores.directory),
            quote_linker: QuoteLinker::new(stores.quotes.clone(), conversations, quote_timeout),
            unread: UnreadTracker::new(stores.rooms.clone(), stores.messages.clone()),
            audit: AuditRecorder::new(stores.audit),
            rooms: stores.rooms,
            messages: stores.messages,
            mentions: stores.mentions,
            quotes: stores.quotes,
            settings,
        }
    }

    /// Load a room of the caller's tenant.
    async fn load_room(&self, caller: Caller, room_id: Uuid) -> Result<Room, ChatError> {
        self.rooms
            .find_by_id(caller.tenant_id, room_id)
            .await?
            .ok_or(ChatError::NotFound)
    }

    /// Load a room and the caller's membership in it.
    async fn load_room_as_member(
        &self,
        caller: Caller,
        room_id: Uuid,
    ) -> Result<(Room, Membership), ChatError> {
        let room = self.load_room(caller, room_id).await?;
        let membership = self
            .rooms
            .find_membership(room.id, caller.user_id)
            .await?
            .ok_or(ChatError::AccessDenied)?;
        Ok((room, membership))
    }

    /// Load a message of the caller's tenant, requiring room membership.
    async fn load_message(&self, caller: Caller, message_id: Uuid) -> Result<Message, ChatError> {
        self.messages
            .find_by_id(caller.tenant_id, message_id)
            .await?
            .ok_or(ChatError::NotFound)
    }

    async fn ensure_member(&self, room_id: Uuid, user_id: i64) -> Result<(), ChatError> {
        if !self.rooms.is_member(room_id, user_id).await? {
            return Err(ChatError::AccessDenied);
        }
        Ok(())
    }

    async fn room_with_members(&self, room: Room) -> Result<RoomDto, ChatError> {
        let members = self.rooms.list_members(room.id).await?;
        Ok(RoomDto { room, members })
    }

    async fn create_direct_room(
        &self,
        caller: Caller,
        member_ids: &[i64],
    ) -> Result<CreatedRoomDto, ChatError> {
        let other = match member_ids {
            [other] => *other,
            _ => {
                return Err(ChatError::validation(
                    "A direct room needs exactly one other member",
                ))
            }
        };
        if other == caller.user_id {
            return Err(ChatError::validation("Cannot open a direct room with yourself"));
        }

        if let Some(existing) = self
            .rooms
            .find_direct(caller.tenant_id, caller.user_id, other)
            .await?
        {
            return Ok(CreatedRoomDto {
                room: self.room_with_members(existing).await?,
                created: false,
            });
        }

        let new_room = NewRoom {
            id: Uuid::now_v7(),
            tenant_id: caller.tenant_id,
            kind: RoomKind::Direct,
            name: None,
            created_by: caller.user_id,
            creator_role: MemberRole::Member,
            member_ids: vec![other],
        };
        let creation = self.rooms.create(&new_room).await?;

        Ok(CreatedRoomDto {
            room: self.room_with_members(creation.room).await?,
            created: creation.created,
        })
    }

    async fn create_group_room(
        &self,
        caller: Caller,
        name: Option<&str>,
        member_ids: &[i64],
    ) -> Result<CreatedRoomDto, ChatError> {
        let name = bounded_text(
            name.unwrap_or_default(),
            "name",
            self.settings.max_room_name_length,
        )
        .map_err(ChatError::Validation)?;

        let mut others: Vec<i64> = Vec::with_capacity(member_ids.len());
        for id in member_ids {
            if *id != caller.user_id && !others.contains(id) {
                others.push(*id);
            }
        }

        let new_room = NewRoom {
            id: Uuid::now_v7(),
            tenant_id: caller.tenant_id,
            kind: RoomKind::Group,
            name: Some(name),
            created_by: caller.user_id,
            creator_role: MemberRole::Owner,
            member_ids: others,
        };
        let creation = self.rooms.create(&new_room).await?;

        Ok(CreatedRoomDto {
            room: self.room_with_members(creation.room).await?,
            created: creation.created,
        })
    }

    /// Attach quotes to a batch of messages with one lookup.
    async fn with_quotes(&self, messages: Vec<Message>) -> Result<Vec<MessageDto>, ChatError> {
        if messages.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = messages.iter().map(|m| m.id).collect();
        let mut quotes: HashMap<Uuid, Quote> = self.quotes.find_by_message_ids(&ids).await?;

        Ok(messages
            .into_iter()
            .map(|message| MessageDto {
                quote: quotes.remove(&message.id),
                message,
            })
            .collect())
    }
}

#[async_trait]
impl ChatService for ChatServiceImpl {
    async fn list_rooms(&self, caller: Caller) -> Result<Vec<RoomSummaryDto>, ChatError> {
        let rooms = self
            .rooms
            .find_by_user(caller.tenant_id, caller.user_id)
            .await?;

        let mut summaries = Vec::with_capacity(rooms.len());
        for room in rooms {
            let members = self.rooms.list_members(room.id).await?;
            let last_message = self.messages.latest(room.id).await?;
            let unread_count = match members.iter().find(|m| m.user_id == caller.user_id) {
                Some(membership) => self.unread.unread_count(membership).await?,
                None => 0,
            };
            summaries.push(RoomSummaryDto {
                room,
                members,
                last_message,
                unread_count,
            });
        }

        Ok(summaries)
    }

    async fn create_room(
        &self,
        caller: Caller,
        request: CreateRoomDto,
    ) -> Result<CreatedRoomDto, ChatError> {
        let kind = RoomKind::parse(&request.kind)
            .ok_or_else(|| ChatError::validation(format!("Unknown room kind '{}'", request.kind)))?;

        let result = match kind {
            RoomKind::Direct => self.create_direct_room(caller, &request.member_ids).await?,
            RoomKind::Group => {
                self.create_group_room(caller, request.name.as_deref(), &request.member_ids)
                    .await?
            }
        };

        if result.created {
            let room = &result.room.room;
            let member_ids: Vec<i64> = result.room.members.iter().map(|m| m.user_id).collect();
            tracing::info!(
                tenant_id = caller.tenant_id,
                user_id = caller.user_id,
                room_id = %room.id,
                kind = %room.kind,
                "room created"
            );
            self.audit
                .record(
                    caller,
                    AuditAction::RoomCreated,
                    room.id.to_string(),
                    json!({ "kind": room.kind.as_str(), "member_ids": member_ids }),
                )
                .await;
        }

        Ok(result)
    }

    async fn get_room(&self, caller: Caller, room_id: Uuid) -> Result<RoomDto, ChatError> {
        let (room, _) = self.load_room_as_member(caller, room_id).await?;
        self.room_with_members(room).await
    }

    async fn add_member(
        &self,
        caller: Caller,
        room_id: Uuid,
        request: AddMemberDto,
    ) -> Result<Membership, ChatError> {
        let (room, actor) = self.load_room_as_member(caller, room_id).await?;

        if !AccessPolicy::allows_membership_changes(&room) {
            return Err(ChatError::validation("Direct room members cannot be changed"));
        }
        if !AccessPolicy::can_add_member(&actor) {
            return Err(ChatError::permission("Only owners and moderators can add members"));
        }

        let role = match request.role.as_deref() {
            None => MemberRole::Member,
            Some(value) => MemberRole::parse(value)
                .ok_or_else(|| ChatError::validation(format!("Unknown role '{}'", value)))?,
        };
        if !AccessPolicy::is_grantable(role) {
            return Err(ChatError::validation("The owner role cannot be granted"));
        }

        let membership = self.rooms.add_member(room.id, request.user_id, role).await?;

        tracing::info!(
            tenant_id = caller.tenant_id,
            user_id = caller.user_id,
            room_id = %room.id,
            member_id = request.user_id,
            role = %role,
            "member added"
        );
        self.audit
            .record(
                caller,
                AuditAction::MemberAdded,
                room.id.to_string(),
                json!({ "user_id": request.user_id, "role": role.as_str() }),
            )
            .await;

        Ok(membership)
    }

    async fn remove_member(
        &self,
        caller: Caller,
        room_id: Uuid,
        user_id: i64,
    ) -> Result<(), ChatError> {
        let (room, actor) = self.load_room_as_member(caller, room_id).await?;

        if !AccessPolicy::allows_membership_changes(&room) {
            return Err(ChatError::validation("Direct room members cannot be changed"));
        }
        if !AccessPolicy::can_remove_member(&actor, user_id) {
            return Err(ChatError::permission(
                "Only owners and moderators can remove other members",
            ));
        }

        if !self.rooms.remove_member(room.id, user_id).await? {
            return Err(ChatError::NotFound);
        }

        tracing::info!(
            tenant_id = caller.tenant_id,
            user_id = caller.user_id,
            room_id = %room.id,
            member_id = user_id,
            "member removed"
        );
        self.audit
            .record(
                caller,
                AuditAction::MemberRemoved,
                room.id.to_string(),
                json!({ "user_id": user_id, "self_removal": user_id == caller.user_id }),
            )
            .await;

        Ok(())
    }

    async fn list_messages(
        &self,
        caller: Caller,
        room_id: Uuid,
        query: MessageQueryDto,
    ) -> Result<MessagePageDto, ChatError> {
        let (room, _) = self.load_room_as_member(caller, room_id).await?;

        let limit = self.settings.page_size(query.limit);
        let messages = self.messages.list(room.id, limit, query.before).await?;
        let next_cursor = messages.last().map(|m| m.created_at);

        Ok(MessagePageDto {
            messages: self.with_quotes(messages).await?,
            next_cursor,
        })
    }

    async fn send_message(
        &self,
        caller: Caller,
        room_id: Uuid,
        request: SendMessageDto,
    ) -> Result<MessageDto, ChatError> {
        let (room, _) = self.load_room_as_member(caller, room_id).await?;

        require_text(&request.content, "content", self.settings.max_content_length)
            .map_err(ChatError::Validation)?;
        let kind = match request.kind.as_deref() {
            None => MessageKind::Text,
            Some(value) => MessageKind::parse(value)
                .ok_or_else(|| ChatError::validation(format!("Unknown message kind '{}'", value)))?,
        };

        let message = self
            .messages
            .append(&NewMessage {
                id: Uuid::now_v7(),
                room_id: room.id,
                tenant_id: caller.tenant_id,
                sender_id: caller.user_id,
                content: request.content,
                kind,
            })
            .await?;

        tracing::debug!(
            tenant_id = caller.tenant_id,
            user_id = caller.user_id,
            room_id = %room.id,
            message_id = %message.id,
            "message sent"
        );

        match self.mention_resolver.resolve(&message).await {
            Ok(mentions) if !mentions.is_empty() => {
                tracing::debug!(message_id = %message.id, count = mentions.len(), "mentions recorded");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    tenant_id = caller.tenant_id,
                    message_id = %message.id,
                    error = %e,
                    "mention extraction failed"
                );
            }
        }

        let quote = match request.quote {
            Some(quote) => Some(
                self.quote_linker
                    .attach(caller.tenant_id, message.id, quote)
                    .await?,
            ),
            None => None,
        };

        Ok(MessageDto { message, quote })
    }

    async fn get_message(&self, caller: Caller, message_id: Uuid) -> Result<MessageDto, ChatError> {
        let message = self.load_message(caller, message_id).await?;
        self.ensure_member(message.room_id, caller.user_id).await?;

        let mut quotes = self.quotes.find_by_message_ids(&[message.id]).await?;
        Ok(MessageDto {
            quote: quotes.remove(&message.id),
            message,
        })
    }

    async fn delete_message(&self, caller: Caller, message_id: Uuid) -> Result<(), ChatError> {
        let message = self.load_message(caller, message_id).await?;

        if message.sender_id != caller.user_id {
            let membership = self
                .rooms
                .find_membership(message.room_id, caller.user_id)
                .await?
                .ok_or(ChatError::AccessDenied)?;
            if !AccessPolicy::can_delete_message(caller.user_id, Some(&membership), &message) {
                return Err(ChatError::permission(
                    "Only owners and moderators can delete other members' messages",
                ));
            }
        }

        if !self.messages.soft_delete(message.id).await? {
            // Already deleted; retries are no-ops.
            return Ok(());
        }

        tracing::info!(
            tenant_id = caller.tenant_id,
            user_id = caller.user_id,
            room_id = %message.room_id,
            message_id = %message.id,
            "message deleted"
        );
        self.audit
            .record(
                caller,
                AuditAction::MessageDeleted,
                message.id.to_string(),
                json!({ "room_id": message.room_id, "sender_id": message.sender_id }),
            )
            .await;

        Ok(())
    }

    async fn mark_room_read(
        &self,
        caller: Caller,
        room_id: Uuid,
    ) -> Result<DateTime<Utc>, ChatError> {
        let (room, _) = self.load_room_as_member(caller, room_id).await?;
        self.unread.mark_read(room.id, caller.user_id).await
    }

    async fn unread_count(&self, caller: Caller, room_id: Uuid) -> Result<i64, ChatError> {
        let (_, membership) = self.load_room_as_member(caller, room_id).await?;
        self.unread.unread_count(&membership).await
    }

    async fn list_mentions(
        &self,
        caller: Caller,
        unread_only: bool,
    ) -> Result<Vec<Mention>, ChatError> {
        let mentions = self
            .mentions
            .list_for_user(caller.tenant_id, caller.user_id, unread_only)
            .await?;
        Ok(mentions)
    }

    async fn mark_mention_read(&self, caller: Caller, mention_id: Uuid) -> Result<(), ChatError> {
        let found = self
            .mentions
            .mark_read(caller.tenant_id, mention_id, caller.user_id)
            .await?;
        if !found {
            return Err(ChatError::NotFound);
        }
        Ok(())
    }

    async fn create_quote(
        &self,
        caller: Caller,
        message_id: Uuid,
        request: QuoteRequestDto,
    ) -> Result<Quote, ChatError> {
        let message = self.load_message(caller, message_id).await?;
        if message.is_deleted() {
            return Err(ChatError::NotFound);
        }
        self.ensure_member(message.room_id, caller.user_id).await?;

        self.quote_linker
            .attach(caller.tenant_id, message.id, request)
            .await
    }
}
