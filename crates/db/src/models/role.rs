//! Role entity model.

use serde::Serialize;
use sqlx::FromRow;
use staffd_core::types::RoleId;

/// A role row from the `roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}
