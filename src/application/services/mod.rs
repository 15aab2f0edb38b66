//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **ChatService**: the orchestrator; authorization and composition of every chat operation
//! - **MentionResolver**: `@handle` tokens to mention rows
//! - **QuoteLinker**: external conversation snapshots attached to messages
//! - **UnreadTracker**: read cursors and unread counts
//! - **AuditRecorder**: best-effort audit trail

pub mod audit_recorder;
pub mod chat_service;
pub mod error;
pub mod mention_resolver;
pub mod quote_linker;
pub mod unread_tracker;

pub use audit_recorder::AuditRecorder;
pub use chat_service::{
    AddMemberDto, ChatService, ChatServiceImpl, ChatStores, CreateRoomDto, CreatedRoomDto,
    MessageDto, MessagePageDto, MessageQueryDto, RoomDto, RoomSummaryDto, SendMessageDto,
};
pub use error::ChatError;
pub use mention_resolver::MentionResolver;
pub use quote_linker::{QuoteLinker, QuoteRequestDto};
pub use unread_tracker::UnreadTracker;
