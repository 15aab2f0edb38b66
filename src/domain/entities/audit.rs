//! Audit entry entity and repository trait.
//!
//! Maps to the `chat_audit_entries` table. Entries are append-only.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::shared::error::AppError;

/// Sensitive actions that leave an audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    RoomCreated,
    MemberAdded,
    MemberRemoved,
    MessageDeleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoomCreated => "room_created",
            Self::MemberAdded => "member_added",
            Self::MemberRemoved => "member_removed",
            Self::MessageDeleted => "message_deleted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "room_created" => Some(Self::RoomCreated),
            "member_added" => Some(Self::MemberAdded),
            "member_removed" => Some(Self::MemberRemoved),
            "message_deleted" => Some(Self::MessageDeleted),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub tenant_id: i64,
    pub actor_id: i64,
    pub action: AuditAction,
    /// Room id or message id
    pub target_ref: String,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub id: Uuid,
    pub tenant_id: i64,
    pub actor_id: i64,
    pub action: AuditAction,
    pub target_ref: String,
    pub metadata: Value,
}

/// Repository trait for the audit trail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn append(&self, entry: &NewAuditEntry) -> Result<AuditEntry, AppError>;

    /// Entries of a tenant, newest first.
    async fn list(&self, tenant_id: i64, limit: i64, offset: i64)
        -> Result<Vec<AuditEntry>, AppError>;
}
