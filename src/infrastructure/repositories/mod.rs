//! Repository Implementations
//!
//! PostgreSQL implementations of the domain repository traits.
//!
//! ## Available Repositories
//!
//! - **PgRoomRepository** - Rooms and memberships, direct-room deduplication
//! - **PgMessageRepository** - Timeline with watermark pagination and soft delete
//! - **PgMentionRepository** - Mention inbox
//! - **PgQuoteRepository** - Conversation snapshots attached to messages
//! - **PgAuditRepository** - Append-only audit trail
//! - **PgUserDirectory** - Read-only tenant user directory

pub mod audit_repository;
pub mod mention_repository;
pub mod message_repository;
pub mod quote_repository;
pub mod room_repository;
pub mod user_directory;

pub use audit_repository::PgAuditRepository;
pub use mention_repository::PgMentionRepository;
pub use message_repository::PgMessageRepository;
pub use quote_repository::PgQuoteRepository;
pub use room_repository::PgRoomRepository;
pub use user_directory::PgUserDirectory;
