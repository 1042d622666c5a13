//! MySQL grant store implementation.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE admin_role_grants (
//!     id          CHAR(36)     NOT NULL PRIMARY KEY,
//!     user_id     CHAR(36)     NOT NULL UNIQUE,
//!     role        VARCHAR(16)  NOT NULL,
//!     permissions TEXT         NOT NULL,
//!     granted_by  CHAR(36)     NOT NULL,
//!     expires_at  TIMESTAMP(6) NULL,
//!     active      BOOLEAN      NOT NULL DEFAULT TRUE,
//!     allowed_ips TEXT         NOT NULL,
//!     created_at  TIMESTAMP(6) NOT NULL,
//!     updated_at  TIMESTAMP(6) NOT NULL
//! );
//! ```
//!
//! `permissions` holds the flat key→bool JSON map, `allowed_ips` the JSON
//! list of rule strings.

use crate::{AdminRoleStore, CreateGrant, GrantUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lumen_core::{
    AdminRole, AdminRoleGrant, GrantId, IpRule, LumenError, LumenResult, PermissionSet, UserId,
};
use sqlx::{FromRow, MySqlPool};
use tracing::{debug, info};
use uuid::Uuid;

/// MySQL implementation of [`AdminRoleStore`].
///
/// The `user_id` unique index is the backstop for concurrent `create` races;
/// a duplicate-key violation surfaces as a validation error.
#[derive(Debug, Clone)]
pub struct MySqlRoleStore {
    pool: MySqlPool,
}

impl MySqlRoleStore {
    /// Creates a new MySQL grant store.
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a grant.
#[derive(Debug, FromRow)]
struct GrantRow {
    id: String, // UUIDs stored as CHAR(36)
    user_id: String,
    role: String,
    permissions: String,
    granted_by: String,
    expires_at: Option<DateTime<Utc>>,
    active: bool,
    allowed_ips: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<GrantRow> for AdminRoleGrant {
    type Error = LumenError;

    fn try_from(row: GrantRow) -> Result<Self, Self::Error> {
        let id = parse_uuid(&row.id)?;
        let user_id = parse_uuid(&row.user_id)?;
        let granted_by = parse_uuid(&row.granted_by)?;

        let role = AdminRole::parse(&row.role)
            .ok_or_else(|| LumenError::internal(format!("Invalid role in database: {}", row.role)))?;

        let permissions: PermissionSet = serde_json::from_str(&row.permissions)?;
        let allowed_ips: Vec<IpRule> = serde_json::from_str(&row.allowed_ips)?;

        Ok(AdminRoleGrant {
            id: GrantId::from_uuid(id),
            user_id: UserId::from_uuid(user_id),
            role,
            permissions,
            granted_by: UserId::from_uuid(granted_by),
            expires_at: row.expires_at,
            active: row.active,
            allowed_ips,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn parse_uuid(s: &str) -> LumenResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| LumenError::internal(format!("Invalid UUID in database: {}", e)))
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, role, permissions, granted_by, expires_at,
           active, allowed_ips, created_at, updated_at
    FROM admin_role_grants
"#;

async fn insert_grant(pool: &MySqlPool, grant: &AdminRoleGrant) -> LumenResult<()> {
    sqlx::query(
        r#"
        INSERT INTO admin_role_grants
            (id, user_id, role, permissions, granted_by, expires_at,
             active, allowed_ips, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(grant.id.to_string())
    .bind(grant.user_id.to_string())
    .bind(grant.role.to_string())
    .bind(serde_json::to_string(&grant.permissions)?)
    .bind(grant.granted_by.to_string())
    .bind(grant.expires_at)
    .bind(grant.active)
    .bind(serde_json::to_string(&grant.allowed_ips)?)
    .bind(grant.created_at)
    .bind(grant.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

#[async_trait]
impl AdminRoleStore for MySqlRoleStore {
    async fn create(&self, request: CreateGrant) -> LumenResult<AdminRoleGrant> {
        debug!("Creating grant for user: {}", request.user_id);

        let user_id = request.user_id;
        let grant = request.into_grant()?;

        if self.get(user_id).await?.is_some() {
            return Err(LumenError::validation(format!(
                "User {} already has an admin role grant",
                user_id
            )));
        }

        insert_grant(&self.pool, &grant).await?;

        info!("Grant created: {} for user {}", grant.id, user_id);
        Ok(grant)
    }

    async fn update(&self, user_id: UserId, update: GrantUpdate) -> LumenResult<AdminRoleGrant> {
        debug!("Updating grant for user: {}", user_id);

        let mut grant = self
            .get(user_id)
            .await?
            .ok_or_else(|| LumenError::not_found("AdminRoleGrant", user_id))?;

        update.apply_to(&mut grant)?;

        sqlx::query(
            r#"
            UPDATE admin_role_grants
            SET role = ?, permissions = ?, expires_at = ?, active = ?,
                allowed_ips = ?, updated_at = ?
            WHERE user_id = ?
            "#,
        )
        .bind(grant.role.to_string())
        .bind(serde_json::to_string(&grant.permissions)?)
        .bind(grant.expires_at)
        .bind(grant.active)
        .bind(serde_json::to_string(&grant.allowed_ips)?)
        .bind(grant.updated_at)
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(grant)
    }

    async fn delete(&self, user_id: UserId) -> LumenResult<()> {
        debug!("Deleting grant for user: {}", user_id);

        let result = sqlx::query("DELETE FROM admin_role_grants WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(LumenError::not_found("AdminRoleGrant", user_id));
        }

        info!("Grant deleted for user {}", user_id);
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> LumenResult<Option<AdminRoleGrant>> {
        let sql = format!("{} WHERE user_id = ?", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, GrantRow>(&sql)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(AdminRoleGrant::try_from).transpose()
    }

    async fn list_all(&self) -> LumenResult<Vec<AdminRoleGrant>> {
        let rows = sqlx::query_as::<_, GrantRow>(SELECT_COLUMNS)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(AdminRoleGrant::try_from).collect()
    }
}
