//! # Domain Entities
//!
//! Core domain entities of the internal chat. Each persisted entity maps to
//! one table and carries its tenant id, directly or through its room.
//!
//! ## Core Entities
//!
//! - **Room**: a direct (two-party) or group room
//! - **Membership**: a user's role and read cursor in a room
//! - **Message**: a timeline entry, soft-deletable
//!
//! ## Derived Entities
//!
//! - **Mention**: a user referenced by `@handle` in a message
//! - **Quote**: a snapshot of an external conversation attached to a message
//! - **AuditEntry**: append-only record of a sensitive action
//!
//! ## Collaborators
//!
//! - **UserDirectory**: the tenant's users, owned by the account module
//! - **ConversationService**: the external CRM conversation API
//!
//! Repository and collaborator traits are implemented in the
//! infrastructure layer.

mod audit;
mod conversation;
mod directory;
mod membership;
mod mention;
mod message;
mod quote;
mod room;

pub use audit::{AuditAction, AuditEntry, AuditRepository, NewAuditEntry};
pub use conversation::{ConversationError, ConversationService};
pub use directory::{DirectoryUser, UserDirectory};
pub use membership::{MemberRole, Membership};
pub use mention::{Mention, MentionRepository, NewMention};
pub use message::{Message, MessageKind, MessageRepository, NewMessage};
pub use quote::{NewQuote, Quote, QuoteRepository};
pub use room::{direct_key, NewRoom, Room, RoomCreation, RoomKind, RoomRepository};

#[cfg(test)]
pub use audit::MockAuditRepository;
#[cfg(test)]
pub use conversation::MockConversationService;
#[cfg(test)]
pub use directory::MockUserDirectory;
#[cfg(test)]
pub use mention::MockMentionRepository;
#[cfg(test)]
pub use message::MockMessageRepository;
#[cfg(test)]
pub use quote::MockQuoteRepository;
#[cfg(test)]
pub use room::MockRoomRepository;
