//! Tenant user directory.
//!
//! Users are owned by the account module; this subsystem only reads them
//! to resolve `@handle` mentions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl DirectoryUser {
    /// Display name with all whitespace removed, lower-cased.
    pub fn name_handle(&self) -> String {
        self.name
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    }

    /// Local part of the email address, lower-cased.
    pub fn email_handle(&self) -> String {
        self.email
            .split('@')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }
}

/// Read access to the users of a tenant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list_users(&self, tenant_id: i64) -> Result<Vec<DirectoryUser>, AppError>;
}
