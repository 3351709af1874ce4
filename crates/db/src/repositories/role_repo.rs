//! Repository for the `roles` table.

use sqlx::PgPool;
use staffd_core::types::RoleId;

use crate::models::role::Role;

/// Provides read operations for roles.
pub struct RoleRepo;

impl RoleRepo {
    /// Find a role by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: RoleId) -> Result<Option<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all roles ordered by ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>("SELECT id, name FROM roles ORDER BY id ASC")
            .fetch_all(pool)
            .await
    }

    /// Resolve a role ID to its name, returning `"unknown"` if the ID is
    /// missing.
    pub async fn resolve_name(pool: &PgPool, role_id: RoleId) -> Result<String, sqlx::Error> {
        Ok(Self::find_by_id(pool, role_id)
            .await?
            .map(|r| r.name)
            .unwrap_or_else(|| "unknown".to_string()))
    }
}
