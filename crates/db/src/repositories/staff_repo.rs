//! Repository for the `staff` table.

use sqlx::PgPool;
use staffd_core::types::StaffId;

use crate::models::staff::{CreateStaff, Staff, StaffFilter, UpdateStaff};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, login, password_hash, role_id, created_at, updated_at";

/// Provides CRUD operations for staff members.
pub struct StaffRepo;

impl StaffRepo {
    /// Insert a new staff member, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStaff) -> Result<Staff, sqlx::Error> {
        let query = format!(
            "INSERT INTO staff (login, password_hash, role_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(&input.login)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .fetch_one(pool)
            .await
    }

    /// Find a staff member by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: StaffId) -> Result<Option<Staff>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff WHERE id = $1");
        sqlx::query_as::<_, Staff>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a staff member by login (case-sensitive).
    pub async fn find_by_login(pool: &PgPool, login: &str) -> Result<Option<Staff>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff WHERE login = $1");
        sqlx::query_as::<_, Staff>(&query)
            .bind(login)
            .fetch_optional(pool)
            .await
    }

    /// List staff with paging, optional login search, and optional role
    /// filter. Returns the page of rows plus the total matching count.
    pub async fn list(
        pool: &PgPool,
        filter: &StaffFilter,
    ) -> Result<(Vec<Staff>, i64), sqlx::Error> {
        let search = filter
            .search_term
            .as_ref()
            .map(|t| format!("%{t}%"))
            .unwrap_or_else(|| "%".to_string());
        let offset = (filter.page - 1) * filter.page_size;

        let query = format!(
            "SELECT {COLUMNS} FROM staff
             WHERE login ILIKE $1
               AND ($2::int IS NULL OR role_id = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, Staff>(&query)
            .bind(&search)
            .bind(filter.role_id)
            .bind(filter.page_size)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let total: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM staff
             WHERE login ILIKE $1
               AND ($2::int IS NULL OR role_id = $2)",
        )
        .bind(&search)
        .bind(filter.role_id)
        .fetch_one(pool)
        .await?;

        Ok((rows, total.0))
    }

    /// Update a staff member. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: StaffId,
        input: &UpdateStaff,
    ) -> Result<Option<Staff>, sqlx::Error> {
        let query = format!(
            "UPDATE staff SET
                login = COALESCE($2, login),
                role_id = COALESCE($3, role_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(id)
            .bind(&input.login)
            .bind(input.role_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace a staff member's password hash. Returns `true` if the row
    /// was updated.
    pub async fn update_password_hash(
        pool: &PgPool,
        id: StaffId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE staff SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a staff member. Sessions cascade via the foreign key.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: StaffId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM staff WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
