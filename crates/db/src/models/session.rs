//! Session row model.

use sqlx::FromRow;
use staffd_core::session::SessionRecord;
use staffd_core::types::{StaffId, Timestamp};
use uuid::Uuid;

/// A session row from the `sessions` table. Tokens are stored as SHA-256
/// digests only.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub staff_id: StaffId,
    pub access_token_hash: String,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub last_activity_at: Timestamp,
}

impl From<SessionRow> for SessionRecord {
    fn from(row: SessionRow) -> Self {
        SessionRecord {
            id: row.id,
            staff_id: row.staff_id,
            access_token_hash: row.access_token_hash,
            refresh_token_hash: row.refresh_token_hash,
            expires_at: row.expires_at,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
        }
    }
}
