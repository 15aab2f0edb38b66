//! Room access rules.

use crate::domain::entities::{MemberRole, Membership, Message, Room};

/// Domain service for role-based mutation rights inside a room.
///
/// Callers establish tenant scope and membership first; these rules only
/// decide between allowed and permission-denied.
pub struct AccessPolicy;

impl AccessPolicy {
    /// Direct rooms keep their two members forever.
    pub fn allows_membership_changes(room: &Room) -> bool {
        !room.is_direct()
    }

    /// Adding someone requires owner or moderator.
    pub fn can_add_member(actor: &Membership) -> bool {
        actor.role.can_moderate()
    }

    /// Anyone may leave; removing others requires owner or moderator.
    pub fn can_remove_member(actor: &Membership, target_user_id: i64) -> bool {
        actor.user_id == target_user_id || actor.role.can_moderate()
    }

    /// The sender may always delete; otherwise owner or moderator of the room.
    pub fn can_delete_message(
        actor_id: i64,
        actor_membership: Option<&Membership>,
        message: &Message,
    ) -> bool {
        if message.sender_id == actor_id {
            return true;
        }
        actor_membership
            .map(|m| m.room_id == message.room_id && m.role.can_moderate())
            .unwrap_or(false)
    }

    /// Ownership is only handed out at room creation.
    pub fn is_grantable(role: MemberRole) -> bool {
        role != MemberRole::Owner
    }
}
