//! Postgres implementation of the core [`SessionStore`] trait.
//!
//! Rotation runs as a single transaction: the `DELETE ... RETURNING` claim,
//! the expiry check, and the insert of the replacement commit together.
//! Concurrent rotations racing on one refresh token serialize on the row
//! delete, so exactly one caller sees [`RotateOutcome::Rotated`].

use async_trait::async_trait;
use sqlx::FromRow;
use staffd_core::session::SessionRecord;
use staffd_core::store::{RotateOutcome, SessionStore, StaffAuth, StoreError};
use staffd_core::types::{RoleId, StaffId, Timestamp};

use crate::models::session::SessionRow;
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, staff_id, access_token_hash, refresh_token_hash, \
                        expires_at, created_at, last_activity_at";

pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Log the driver error and return the sanitized store failure.
fn store_err(context: &str, err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, context, "session store query failed");
    StoreError(context.to_string())
}

#[derive(Debug, FromRow)]
struct StaffAuthRow {
    staff_id: StaffId,
    role_id: RoleId,
    role_name: String,
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn insert(&self, session: &SessionRecord) -> Result<(), StoreError> {
        let query = format!(
            "INSERT INTO sessions
                (id, staff_id, access_token_hash, refresh_token_hash,
                 expires_at, created_at, last_activity_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(session.id)
            .bind(session.staff_id)
            .bind(&session.access_token_hash)
            .bind(&session.refresh_token_hash)
            .bind(session.expires_at)
            .bind(session.created_at)
            .bind(session.last_activity_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_err("failed to insert session", e))?;
        Ok(())
    }

    async fn find_by_access_hash(
        &self,
        access_hash: &str,
    ) -> Result<Option<SessionRecord>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE access_token_hash = $1");
        let row = sqlx::query_as::<_, SessionRow>(&query)
            .bind(access_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_err("failed to look up session", e))?;
        Ok(row.map(SessionRecord::from))
    }

    async fn find_by_refresh_hash(
        &self,
        refresh_hash: &str,
    ) -> Result<Option<SessionRecord>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE refresh_token_hash = $1");
        let row = sqlx::query_as::<_, SessionRow>(&query)
            .bind(refresh_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_err("failed to look up session", e))?;
        Ok(row.map(SessionRecord::from))
    }

    async fn delete_by_access_hash(&self, access_hash: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE access_token_hash = $1")
            .bind(access_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| store_err("failed to delete session", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_staff(&self, staff_id: StaffId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE staff_id = $1")
            .bind(staff_id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_err("failed to delete staff sessions", e))?;
        Ok(result.rows_affected())
    }

    async fn rotate(
        &self,
        refresh_hash: &str,
        now: Timestamp,
        replacement: &SessionRecord,
    ) -> Result<RotateOutcome, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_err("failed to begin rotation", e))?;

        // The claim: of all concurrent callers, only one gets the row.
        let claim_query =
            format!("DELETE FROM sessions WHERE refresh_token_hash = $1 RETURNING {COLUMNS}");
        let claimed = sqlx::query_as::<_, SessionRow>(&claim_query)
            .bind(refresh_hash)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| store_err("failed to claim session", e))?;

        let Some(previous) = claimed else {
            tx.rollback()
                .await
                .map_err(|e| store_err("failed to roll back rotation", e))?;
            return Ok(RotateOutcome::NotFound);
        };

        if now >= previous.expires_at {
            // Keep the delete: the expired row is cleaned up eagerly.
            tx.commit()
                .await
                .map_err(|e| store_err("failed to commit expiry cleanup", e))?;
            return Ok(RotateOutcome::Expired);
        }

        sqlx::query(
            "INSERT INTO sessions
                (id, staff_id, access_token_hash, refresh_token_hash,
                 expires_at, created_at, last_activity_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(replacement.id)
        .bind(replacement.staff_id)
        .bind(&replacement.access_token_hash)
        .bind(&replacement.refresh_token_hash)
        .bind(replacement.expires_at)
        .bind(replacement.created_at)
        .bind(replacement.last_activity_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| store_err("failed to insert replacement session", e))?;

        tx.commit()
            .await
            .map_err(|e| store_err("failed to commit rotation", e))?;

        Ok(RotateOutcome::Rotated {
            previous: previous.into(),
        })
    }

    async fn staff_auth(&self, staff_id: StaffId) -> Result<Option<StaffAuth>, StoreError> {
        let row = sqlx::query_as::<_, StaffAuthRow>(
            "SELECT s.id AS staff_id, s.role_id, r.name AS role_name
             FROM staff s
             JOIN roles r ON r.id = s.role_id
             WHERE s.id = $1",
        )
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("failed to resolve staff role", e))?;

        Ok(row.map(|r| StaffAuth {
            staff_id: r.staff_id,
            role_id: r.role_id,
            role_name: r.role_name,
        }))
    }
}
