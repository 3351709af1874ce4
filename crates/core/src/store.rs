//! The `SessionStore` persistence seam.
//!
//! All session state lives behind this trait; it is the single
//! synchronization point between concurrent calls. `crates/db` provides the
//! Postgres implementation; [`memory::MemorySessionStore`] backs tests and
//! single-process setups.

use async_trait::async_trait;

use crate::session::SessionRecord;
use crate::types::{RoleId, StaffId, Timestamp};

pub mod memory;

/// Persistence failure, sanitized for callers. Driver details belong in the
/// implementation's tracing output, not in this message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("session store failure: {0}")]
pub struct StoreError(pub String);

/// The authorization-relevant slice of a staff record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffAuth {
    pub staff_id: StaffId,
    pub role_id: RoleId,
    pub role_name: String,
}

/// Result of an atomic rotation attempt.
#[derive(Debug, Clone)]
pub enum RotateOutcome {
    /// The old session was claimed and the replacement inserted, as one unit.
    Rotated { previous: SessionRecord },
    /// No session matched the refresh token; a racing rotation already
    /// claimed it, or it never existed.
    NotFound,
    /// The session existed but was past expiry. The row has been deleted.
    Expired,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session. Token digests must be unique across rows.
    async fn insert(&self, session: &SessionRecord) -> Result<(), StoreError>;

    /// Look up a session by its access-token digest.
    async fn find_by_access_hash(
        &self,
        access_hash: &str,
    ) -> Result<Option<SessionRecord>, StoreError>;

    /// Look up a session by its refresh-token digest. Read-only; rotation
    /// must go through [`SessionStore::rotate`].
    async fn find_by_refresh_hash(
        &self,
        refresh_hash: &str,
    ) -> Result<Option<SessionRecord>, StoreError>;

    /// Delete a session by its access-token digest. Returns whether a row
    /// existed; deleting an absent session is not an error.
    async fn delete_by_access_hash(&self, access_hash: &str) -> Result<bool, StoreError>;

    /// Delete every session owned by the staff member. Returns the count.
    async fn delete_all_for_staff(&self, staff_id: StaffId) -> Result<u64, StoreError>;

    /// Atomically claim the session matching `refresh_hash` and replace it
    /// with `replacement`.
    ///
    /// The claim, the expiry check against `now`, and the insert of the
    /// replacement must be one unit: concurrent callers racing on the same
    /// refresh token see exactly one [`RotateOutcome::Rotated`]; every loser
    /// sees [`RotateOutcome::NotFound`]. An expired claim deletes the row
    /// without inserting the replacement.
    async fn rotate(
        &self,
        refresh_hash: &str,
        now: Timestamp,
        replacement: &SessionRecord,
    ) -> Result<RotateOutcome, StoreError>;

    /// Resolve the staff identity and role a session belongs to.
    async fn staff_auth(&self, staff_id: StaffId) -> Result<Option<StaffAuth>, StoreError>;
}
