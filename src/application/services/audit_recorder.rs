//! Audit Recorder
//!
//! Appends the audit trail for sensitive chat actions. Recording runs after
//! the primary mutation has committed and never fails it.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::domain::{AuditAction, AuditRepository, Caller, NewAuditEntry};

pub struct AuditRecorder {
    repo: Arc<dyn AuditRepository>,
}

impl AuditRecorder {
    pub fn new(repo: Arc<dyn AuditRepository>) -> Self {
        Self { repo }
    }

    /// Append an entry. Failures are logged and swallowed.
    ///
    /// Returns whether the entry was written, for callers that care.
    pub async fn record(
        &self,
        caller: Caller,
        action: AuditAction,
        target_ref: impl Into<String>,
        metadata: Value,
    ) -> bool {
        let entry = NewAuditEntry {
            id: Uuid::now_v7(),
            tenant_id: caller.tenant_id,
            actor_id: caller.user_id,
            action,
            target_ref: target_ref.into(),
            metadata,
        };

        match self.repo.append(&entry).await {
            Ok(_) => {
                tracing::debug!(
                    tenant_id = caller.tenant_id,
                    actor_id = caller.user_id,
                    action = %action,
                    target = %entry.target_ref,
                    "audit entry recorded"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    tenant_id = caller.tenant_id,
                    actor_id = caller.user_id,
                    action = %action,
                    target = %entry.target_ref,
                    error = %e,
                    "failed to record audit entry"
                );
                false
            }
        }
    }
}
