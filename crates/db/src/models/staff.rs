//! Staff entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use staffd_core::types::{RoleId, StaffId, Timestamp};

/// Full staff row from the `staff` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`StaffResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Staff {
    pub id: StaffId,
    pub login: String,
    pub password_hash: String,
    pub role_id: RoleId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe staff representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct StaffResponse {
    pub id: StaffId,
    pub login: String,
    pub role_id: RoleId,
    /// Resolved role name (e.g. `"owner"`, `"admin"`).
    pub role_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new staff member.
pub struct CreateStaff {
    pub login: String,
    pub password_hash: String,
    pub role_id: RoleId,
}

/// DTO for updating an existing staff member. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateStaff {
    pub login: Option<String>,
    pub role_id: Option<RoleId>,
}

/// Filter and paging parameters for staff listing.
#[derive(Debug, Clone, Default)]
pub struct StaffFilter {
    pub page: i64,
    pub page_size: i64,
    pub search_term: Option<String>,
    pub role_id: Option<RoleId>,
}
