//! User Directory Implementation
//!
//! Read-only view of the tenant's users. The `users` table belongs to the
//! account module.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{DirectoryUser, UserDirectory};
use crate::shared::error::AppError;

pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DirectoryRow {
    id: i64,
    name: String,
    email: String,
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn list_users(&self, tenant_id: i64) -> Result<Vec<DirectoryUser>, AppError> {
        let rows = sqlx::query_as::<_, DirectoryRow>(
            r#"
            SELECT id, COALESCE(name, '') AS name, COALESCE(email, '') AS email
            FROM users
            WHERE account_id = $1
            ORDER BY id
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DirectoryUser {
                id: row.id,
                name: row.name,
                email: row.email,
            })
            .collect())
    }
}
