//! Caller identity.

use serde::{Deserialize, Serialize};

/// The already-authenticated identity an operation runs as.
///
/// Produced by the platform's authentication layer; this subsystem trusts
/// it and never verifies credentials itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Caller {
    pub tenant_id: i64,
    pub user_id: i64,
}

impl Caller {
    pub fn new(tenant_id: i64, user_id: i64) -> Self {
        Self { tenant_id, user_id }
    }
}

impl std::fmt::Display for Caller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tenant {} / user {}", self.tenant_id, self.user_id)
    }
}
