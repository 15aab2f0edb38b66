//! Room Repository Implementation
//!
//! PostgreSQL implementation of rooms and memberships. Room creation and its
//! memberships share one transaction; direct rooms are deduplicated by the
//! unique `(tenant_id, direct_key)` index.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{
    direct_key, MemberRole, Membership, NewRoom, Room, RoomCreation, RoomKind, RoomRepository,
};
use crate::shared::error::{conflict_on_unique, AppError};

const ROOM_COLUMNS: &str = "id, tenant_id, kind, name, created_by, created_at, updated_at";
const MEMBERSHIP_COLUMNS: &str = "id, room_id, user_id, role, last_read_at, created_at";

/// PostgreSQL room repository implementation.
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_direct_key(&self, tenant_id: i64, key: &str) -> Result<Option<Room>, AppError> {
        let row = sqlx::query_as::<_, RoomRow>(&format!(
            "SELECT {ROOM_COLUMNS} FROM chat_rooms WHERE tenant_id = $1 AND direct_key = $2"
        ))
        .bind(tenant_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(RoomRow::into_room).transpose()
    }
}

/// Internal row type for `chat_rooms`.
#[derive(Debug, sqlx::FromRow)]
struct RoomRow {
    id: Uuid,
    tenant_id: i64,
    kind: String,
    name: Option<String>,
    created_by: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RoomRow {
    fn into_room(self) -> Result<Room, AppError> {
        let kind = RoomKind::parse(&self.kind)
            .ok_or_else(|| AppError::Internal(format!("Unknown room kind '{}'", self.kind)))?;
        Ok(Room {
            id: self.id,
            tenant_id: self.tenant_id,
            kind,
            name: self.name,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Internal row type for `chat_memberships`.
#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    id: Uuid,
    room_id: Uuid,
    user_id: i64,
    role: String,
    last_read_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl MembershipRow {
    fn into_membership(self) -> Result<Membership, AppError> {
        let role = MemberRole::parse(&self.role)
            .ok_or_else(|| AppError::Internal(format!("Unknown member role '{}'", self.role)))?;
        Ok(Membership {
            id: self.id,
            room_id: self.room_id,
            user_id: self.user_id,
            role,
            last_read_at: self.last_read_at,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    async fn find_by_id(&self, tenant_id: i64, room_id: Uuid) -> Result<Option<Room>, AppError> {
        let row = sqlx::query_as::<_, RoomRow>(&format!(
            "SELECT {ROOM_COLUMNS} FROM chat_rooms WHERE id = $1 AND tenant_id = $2"
        ))
        .bind(room_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(RoomRow::into_room).transpose()
    }

    async fn find_direct(
        &self,
        tenant_id: i64,
        user_a: i64,
        user_b: i64,
    ) -> Result<Option<Room>, AppError> {
        self.find_by_direct_key(tenant_id, &direct_key(user_a, user_b))
            .await
    }

    /// Insert the room and every membership in one transaction.
    ///
    /// A direct room whose pair key already exists is not inserted; the
    /// transaction is rolled back and the existing room returned instead.
    async fn create(&self, room: &NewRoom) -> Result<RoomCreation, AppError> {
        let key = room.direct_key();
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, RoomRow>(&format!(
            r#"
            INSERT INTO chat_rooms (id, tenant_id, kind, name, direct_key, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (tenant_id, direct_key) WHERE direct_key IS NOT NULL DO NOTHING
            RETURNING {ROOM_COLUMNS}
            "#
        ))
        .bind(room.id)
        .bind(room.tenant_id)
        .bind(room.kind.as_str())
        .bind(&room.name)
        .bind(&key)
        .bind(room.created_by)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = inserted else {
            tx.rollback().await?;
            let existing = match key {
                Some(key) => self.find_by_direct_key(room.tenant_id, &key).await?,
                None => None,
            };
            return existing
                .map(|room| RoomCreation {
                    room,
                    created: false,
                })
                .ok_or_else(|| AppError::Conflict("Room already exists".to_string()));
        };

        let members = std::iter::once((room.created_by, room.creator_role))
            .chain(room.member_ids.iter().map(|id| (*id, MemberRole::Member)));
        for (user_id, role) in members {
            sqlx::query(
                r#"
                INSERT INTO chat_memberships (id, room_id, user_id, role)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(room.id)
            .bind(user_id)
            .bind(role.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, "Duplicate room member"))?;
        }

        tx.commit().await?;

        Ok(RoomCreation {
            room: row.into_room()?,
            created: true,
        })
    }

    async fn find_by_user(&self, tenant_id: i64, user_id: i64) -> Result<Vec<Room>, AppError> {
        let rows = sqlx::query_as::<_, RoomRow>(
            r#"
            SELECT r.id, r.tenant_id, r.kind, r.name, r.created_by, r.created_at, r.updated_at
            FROM chat_rooms r
            INNER JOIN chat_memberships m ON m.room_id = r.id
            WHERE r.tenant_id = $1 AND m.user_id = $2
            ORDER BY r.updated_at DESC, r.id DESC
            "#,
        )
        .bind(tenant_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RoomRow::into_room).collect()
    }

    async fn list_members(&self, room_id: Uuid) -> Result<Vec<Membership>, AppError> {
        let rows = sqlx::query_as::<_, MembershipRow>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM chat_memberships WHERE room_id = $1 ORDER BY created_at, user_id"
        ))
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MembershipRow::into_membership).collect()
    }

    async fn find_membership(
        &self,
        room_id: Uuid,
        user_id: i64,
    ) -> Result<Option<Membership>, AppError> {
        let row = sqlx::query_as::<_, MembershipRow>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM chat_memberships WHERE room_id = $1 AND user_id = $2"
        ))
        .bind(room_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MembershipRow::into_membership).transpose()
    }

    async fn is_member(&self, room_id: Uuid, user_id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM chat_memberships WHERE room_id = $1 AND user_id = $2)",
        )
        .bind(room_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn add_member(
        &self,
        room_id: Uuid,
        user_id: i64,
        role: MemberRole,
    ) -> Result<Membership, AppError> {
        let row = sqlx::query_as::<_, MembershipRow>(&format!(
            r#"
            INSERT INTO chat_memberships (id, room_id, user_id, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {MEMBERSHIP_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(room_id)
        .bind(user_id)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "User is already a member of this room"))?;

        row.into_membership()
    }

    async fn remove_member(&self, room_id: Uuid, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM chat_memberships WHERE room_id = $1 AND user_id = $2")
            .bind(room_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_read(
        &self,
        room_id: Uuid,
        user_id: i64,
    ) -> Result<Option<DateTime<Utc>>, AppError> {
        let cursor: Option<DateTime<Utc>> = sqlx::query_scalar(
            r#"
            UPDATE chat_memberships
            SET last_read_at = clock_timestamp()
            WHERE room_id = $1 AND user_id = $2
            RETURNING last_read_at
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cursor)
    }
}
