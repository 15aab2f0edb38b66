//! Audit Repository Implementation
//!
//! Append-only; there is no update or delete path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{AuditAction, AuditEntry, AuditRepository, NewAuditEntry};
use crate::shared::error::AppError;

const AUDIT_COLUMNS: &str = "id, tenant_id, actor_id, action, target_ref, metadata, created_at";

/// PostgreSQL audit repository implementation.
pub struct PgAuditRepository {
    pool: PgPool,
}

impl PgAuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    tenant_id: i64,
    actor_id: i64,
    action: String,
    target_ref: String,
    metadata: Value,
    created_at: DateTime<Utc>,
}

impl AuditRow {
    fn into_entry(self) -> Result<AuditEntry, AppError> {
        let action = AuditAction::parse(&self.action)
            .ok_or_else(|| AppError::Internal(format!("Unknown audit action '{}'", self.action)))?;
        Ok(AuditEntry {
            id: self.id,
            tenant_id: self.tenant_id,
            actor_id: self.actor_id,
            action,
            target_ref: self.target_ref,
            metadata: self.metadata,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl AuditRepository for PgAuditRepository {
    async fn append(&self, entry: &NewAuditEntry) -> Result<AuditEntry, AppError> {
        let row = sqlx::query_as::<_, AuditRow>(&format!(
            r#"
            INSERT INTO chat_audit_entries (id, tenant_id, actor_id, action, target_ref, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {AUDIT_COLUMNS}
            "#
        ))
        .bind(entry.id)
        .bind(entry.tenant_id)
        .bind(entry.actor_id)
        .bind(entry.action.as_str())
        .bind(&entry.target_ref)
        .bind(&entry.metadata)
        .fetch_one(&self.pool)
        .await?;

        row.into_entry()
    }

    async fn list(
        &self,
        tenant_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditEntry>, AppError> {
        let rows = sqlx::query_as::<_, AuditRow>(&format!(
            r#"
            SELECT {AUDIT_COLUMNS}
            FROM chat_audit_entries
            WHERE tenant_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(tenant_id)
        .bind(limit.clamp(1, 100))
        .bind(offset.max(0))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AuditRow::into_entry).collect()
    }
}
