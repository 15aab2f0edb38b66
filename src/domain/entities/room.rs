//! Room entity and repository trait.
//!
//! Maps to the `chat_rooms` and `chat_memberships` tables. Rooms and their
//! memberships form one store: membership rows are only ever reached
//! through their room.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::membership::{MemberRole, Membership};
use crate::shared::error::AppError;

/// Room kinds matching the `chat_rooms.kind` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    /// Two-party direct message room
    #[serde(rename = "dm")]
    Direct,
    /// Named room with owner/moderator/member roles
    #[serde(rename = "group")]
    Group,
}

impl RoomKind {
    /// Parse the database/wire representation.
    ///
    /// `room` is accepted as an alias of `group`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dm" => Some(Self::Direct),
            "group" | "room" => Some(Self::Group),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "dm",
            Self::Group => "group",
        }
    }
}

impl std::fmt::Display for RoomKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A chat room owned by one tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub tenant_id: i64,
    pub kind: RoomKind,
    /// Always `None` for direct rooms
    pub name: Option<String>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn is_direct(&self) -> bool {
        self.kind == RoomKind::Direct
    }
}

/// Canonical key for an unordered user pair, used to deduplicate direct rooms.
pub fn direct_key(user_a: i64, user_b: i64) -> String {
    let (low, high) = if user_a <= user_b {
        (user_a, user_b)
    } else {
        (user_b, user_a)
    };
    format!("{}:{}", low, high)
}

/// Input for creating a room together with its memberships.
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub id: Uuid,
    pub tenant_id: i64,
    pub kind: RoomKind,
    pub name: Option<String>,
    pub created_by: i64,
    pub creator_role: MemberRole,
    /// Other members, excluding the creator, without duplicates
    pub member_ids: Vec<i64>,
}

impl NewRoom {
    /// The dedup key when this is a direct room.
    pub fn direct_key(&self) -> Option<String> {
        match (self.kind, self.member_ids.as_slice()) {
            (RoomKind::Direct, [other]) => Some(direct_key(self.created_by, *other)),
            _ => None,
        }
    }
}

/// Outcome of [`RoomRepository::create`].
#[derive(Debug, Clone)]
pub struct RoomCreation {
    pub room: Room,
    /// `false` when an existing direct room for the same pair was returned
    pub created: bool,
}

/// Repository trait for rooms and their memberships.
///
/// Every room lookup takes the tenant id so that a foreign room resolves as
/// absent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Find a room by id within a tenant.
    async fn find_by_id(&self, tenant_id: i64, room_id: Uuid) -> Result<Option<Room>, AppError>;

    /// Find the direct room between two users, in either order.
    async fn find_direct(
        &self,
        tenant_id: i64,
        user_a: i64,
        user_b: i64,
    ) -> Result<Option<Room>, AppError>;

    /// Create a room and all of its memberships atomically.
    ///
    /// For direct rooms, a concurrent creation of the same pair yields the
    /// already existing room with `created == false`.
    async fn create(&self, room: &NewRoom) -> Result<RoomCreation, AppError>;

    /// All rooms of a tenant in which the user holds a membership.
    async fn find_by_user(&self, tenant_id: i64, user_id: i64) -> Result<Vec<Room>, AppError>;

    /// All memberships of a room.
    async fn list_members(&self, room_id: Uuid) -> Result<Vec<Membership>, AppError>;

    /// The membership of a user in a room, if any.
    async fn find_membership(
        &self,
        room_id: Uuid,
        user_id: i64,
    ) -> Result<Option<Membership>, AppError>;

    /// Check whether a user is a member of a room.
    async fn is_member(&self, room_id: Uuid, user_id: i64) -> Result<bool, AppError>;

    /// Add a membership. Fails with `Conflict` if it already exists.
    async fn add_member(
        &self,
        room_id: Uuid,
        user_id: i64,
        role: MemberRole,
    ) -> Result<Membership, AppError>;

    /// Remove a membership. Returns `false` if there was none.
    async fn remove_member(&self, room_id: Uuid, user_id: i64) -> Result<bool, AppError>;

    /// Set the membership's read cursor to the store's current time.
    ///
    /// Returns the new cursor, or `None` if the membership does not exist.
    async fn mark_read(
        &self,
        room_id: Uuid,
        user_id: i64,
    ) -> Result<Option<DateTime<Utc>>, AppError>;
}
