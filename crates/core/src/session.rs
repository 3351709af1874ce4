//! Session lifecycle manager.
//!
//! Owns creation, validation, rotation, and invalidation of sessions. The
//! manager holds no mutable state of its own; every decision is made against
//! the injected [`SessionStore`], so one instance is shared across all
//! concurrent calls.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::store::{RotateOutcome, SessionStore, StaffAuth, StoreError};
use crate::token::{generate_token, hash_token};
use crate::types::{StaffId, Timestamp};

/// A stored session row. Tokens appear only as digests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: Uuid,
    pub staff_id: StaffId,
    pub access_token_hash: String,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub last_activity_at: Timestamp,
}

/// A freshly issued session: the only place plaintext tokens exist.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub staff_id: StaffId,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Timestamp,
}

/// Session tunables. `refresh_token_ttl` is accepted for parity with the
/// configuration surface but the session row carries a single expiry set
/// from `access_token_ttl`; rotation and validation share that expiry.
#[derive(Debug, Clone)]
pub struct SessionManagerConfig {
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl Default for SessionManagerConfig {
    fn default() -> Self {
        Self {
            access_token_ttl: Duration::hours(1),
            refresh_token_ttl: Duration::days(7),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,

    #[error("session expired")]
    Expired,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    config: SessionManagerConfig,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, config: SessionManagerConfig) -> Self {
        Self { store, config }
    }

    /// Create and persist a session for `staff_id`.
    ///
    /// Generates two independent opaque tokens; expiry is fixed at
    /// `now + access_token_ttl` and never extended afterwards. A store
    /// failure leaves no partial record.
    pub async fn create_session(&self, staff_id: StaffId) -> Result<IssuedSession, SessionError> {
        let (record, issued) = self.new_session(staff_id);
        self.store.insert(&record).await?;
        Ok(issued)
    }

    /// Resolve an access token to the owning staff identity and role.
    ///
    /// An expired session is deleted on the spot (lazy expiry) before the
    /// error is returned; a second call with the same token sees
    /// [`SessionError::NotFound`]. Validation never extends expiry.
    pub async fn validate(&self, access_token: &str) -> Result<StaffAuth, SessionError> {
        let access_hash = hash_token(access_token);

        let session = self
            .store
            .find_by_access_hash(&access_hash)
            .await?
            .ok_or(SessionError::NotFound)?;

        if Utc::now() >= session.expires_at {
            self.store.delete_by_access_hash(&access_hash).await?;
            return Err(SessionError::Expired);
        }

        self.store
            .staff_auth(session.staff_id)
            .await?
            .ok_or(SessionError::NotFound)
    }

    /// Exchange a refresh token for a brand-new session.
    ///
    /// The old token pair becomes invalid the instant rotation succeeds;
    /// there is no overlap window. Concurrent rotations racing on the same
    /// refresh token resolve to exactly one winner, every loser observing
    /// [`SessionError::NotFound`].
    pub async fn rotate(&self, refresh_token: &str) -> Result<IssuedSession, SessionError> {
        let refresh_hash = hash_token(refresh_token);

        // A plain read to learn the owner; the claim itself happens inside
        // the store's atomic rotate, so a racing caller deleting the row
        // after this read still resolves to NotFound below.
        let previous = self
            .store
            .find_by_refresh_hash(&refresh_hash)
            .await?
            .ok_or(SessionError::NotFound)?;

        let (record, issued) = self.new_session(previous.staff_id);
        match self
            .store
            .rotate(&refresh_hash, Utc::now(), &record)
            .await?
        {
            RotateOutcome::Rotated { .. } => Ok(issued),
            RotateOutcome::NotFound => Err(SessionError::NotFound),
            RotateOutcome::Expired => Err(SessionError::Expired),
        }
    }

    /// Delete the session for `access_token`. Idempotent: an absent session
    /// is not an error.
    pub async fn invalidate(&self, access_token: &str) -> Result<(), SessionError> {
        let access_hash = hash_token(access_token);
        self.store.delete_by_access_hash(&access_hash).await?;
        Ok(())
    }

    /// Delete every session owned by `staff_id`. Returns the count removed.
    pub async fn invalidate_all_for_staff(&self, staff_id: StaffId) -> Result<u64, SessionError> {
        Ok(self.store.delete_all_for_staff(staff_id).await?)
    }

    fn new_session(&self, staff_id: StaffId) -> (SessionRecord, IssuedSession) {
        let (access_token, access_hash) = generate_token();
        let (refresh_token, refresh_hash) = generate_token();
        let now = Utc::now();
        let expires_at = now + self.config.access_token_ttl;

        let record = SessionRecord {
            id: Uuid::new_v4(),
            staff_id,
            access_token_hash: access_hash,
            refresh_token_hash: refresh_hash,
            expires_at,
            created_at: now,
            last_activity_at: now,
        };
        let issued = IssuedSession {
            staff_id,
            access_token,
            refresh_token,
            expires_at,
        };
        (record, issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{role_name, ROLE_ADMIN};
    use crate::store::memory::MemorySessionStore;
    use crate::store::SessionStore;
    use assert_matches::assert_matches;

    fn manager_with_ttl(ttl: Duration) -> (SessionManager, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        let config = SessionManagerConfig {
            access_token_ttl: ttl,
            ..SessionManagerConfig::default()
        };
        let manager = SessionManager::new(store.clone(), config);
        (manager, store)
    }

    fn register_staff(store: &MemorySessionStore, staff_id: StaffId) {
        store.register_staff(StaffAuth {
            staff_id,
            role_id: ROLE_ADMIN,
            role_name: role_name(ROLE_ADMIN).to_string(),
        });
    }

    #[tokio::test]
    async fn test_successive_sessions_have_distinct_tokens() {
        let (manager, _store) = manager_with_ttl(Duration::hours(1));
        let staff_id = Uuid::new_v4();

        let a = manager.create_session(staff_id).await.unwrap();
        let b = manager.create_session(staff_id).await.unwrap();

        assert_ne!(a.access_token, b.access_token);
        assert_ne!(a.refresh_token, b.refresh_token);
        assert_ne!(a.access_token, a.refresh_token);
    }

    #[tokio::test]
    async fn test_validate_resolves_staff_and_role() {
        let (manager, store) = manager_with_ttl(Duration::hours(1));
        let staff_id = Uuid::new_v4();
        register_staff(&store, staff_id);

        let issued = manager.create_session(staff_id).await.unwrap();
        let auth = manager.validate(&issued.access_token).await.unwrap();

        assert_eq!(auth.staff_id, staff_id);
        assert_eq!(auth.role_id, ROLE_ADMIN);
    }

    #[tokio::test]
    async fn test_validate_unknown_token() {
        let (manager, _store) = manager_with_ttl(Duration::hours(1));

        let result = manager.validate("no-such-token").await;
        assert_matches!(result, Err(SessionError::NotFound));
    }

    #[tokio::test]
    async fn test_expired_session_is_deleted_lazily() {
        let (manager, store) = manager_with_ttl(Duration::milliseconds(30));
        let staff_id = Uuid::new_v4();
        register_staff(&store, staff_id);

        let issued = manager.create_session(staff_id).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(60)).await;

        // First access reports the expiry and deletes the row.
        let first = manager.validate(&issued.access_token).await;
        assert_matches!(first, Err(SessionError::Expired));

        // Second access proves the eager deletion.
        let second = manager.validate(&issued.access_token).await;
        assert_matches!(second, Err(SessionError::NotFound));
        assert_eq!(store.session_count(), 0);
    }

    #[tokio::test]
    async fn test_rotate_invalidates_old_tokens() {
        let (manager, store) = manager_with_ttl(Duration::hours(1));
        let staff_id = Uuid::new_v4();
        register_staff(&store, staff_id);

        let old = manager.create_session(staff_id).await.unwrap();
        let new = manager.rotate(&old.refresh_token).await.unwrap();

        assert_eq!(new.staff_id, staff_id);
        assert_ne!(new.access_token, old.access_token);

        // The old pair died the instant rotation succeeded.
        let stale_access = manager.validate(&old.access_token).await;
        assert_matches!(stale_access, Err(SessionError::NotFound));
        let stale_refresh = manager.rotate(&old.refresh_token).await;
        assert_matches!(stale_refresh, Err(SessionError::NotFound));

        // The new pair works.
        manager.validate(&new.access_token).await.unwrap();
        assert_eq!(store.session_count(), 1);
    }

    #[tokio::test]
    async fn test_rotate_expired_session() {
        let (manager, store) = manager_with_ttl(Duration::milliseconds(30));
        let staff_id = Uuid::new_v4();
        register_staff(&store, staff_id);

        let issued = manager.create_session(staff_id).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(60)).await;

        let result = manager.rotate(&issued.refresh_token).await;
        assert_matches!(result, Err(SessionError::Expired));
        // The expired row was deleted before the error surfaced.
        assert_eq!(store.session_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_rotation_has_one_winner() {
        let (manager, store) = manager_with_ttl(Duration::hours(1));
        let staff_id = Uuid::new_v4();
        register_staff(&store, staff_id);

        let issued = manager.create_session(staff_id).await.unwrap();

        let (a, b) = tokio::join!(
            manager.rotate(&issued.refresh_token),
            manager.rotate(&issued.refresh_token),
        );

        let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1, "exactly one rotation must succeed");

        let loser = if a.is_ok() { b } else { a };
        assert_matches!(loser, Err(SessionError::NotFound));
        assert_eq!(store.session_count(), 1, "exactly one session remains");
    }

    #[tokio::test]
    async fn test_invalidate_is_idempotent() {
        let (manager, store) = manager_with_ttl(Duration::hours(1));
        let staff_id = Uuid::new_v4();
        register_staff(&store, staff_id);

        let issued = manager.create_session(staff_id).await.unwrap();
        manager.invalidate(&issued.access_token).await.unwrap();
        // Deleting an already-absent session is still a success.
        manager.invalidate(&issued.access_token).await.unwrap();

        let result = manager.validate(&issued.access_token).await;
        assert_matches!(result, Err(SessionError::NotFound));
        assert_eq!(store.session_count(), 0);
    }

    #[tokio::test]
    async fn test_invalidate_all_for_staff() {
        let (manager, store) = manager_with_ttl(Duration::hours(1));
        let staff_id = Uuid::new_v4();
        let other_id = Uuid::new_v4();
        register_staff(&store, staff_id);
        register_staff(&store, other_id);

        let first = manager.create_session(staff_id).await.unwrap();
        let second = manager.create_session(staff_id).await.unwrap();
        let unrelated = manager.create_session(other_id).await.unwrap();

        let removed = manager.invalidate_all_for_staff(staff_id).await.unwrap();
        assert_eq!(removed, 2);

        assert_matches!(
            manager.validate(&first.access_token).await,
            Err(SessionError::NotFound)
        );
        assert_matches!(
            manager.validate(&second.access_token).await,
            Err(SessionError::NotFound)
        );
        // Other staff members keep their sessions.
        manager.validate(&unrelated.access_token).await.unwrap();
    }

    #[tokio::test]
    async fn test_expiry_is_fixed_at_creation() {
        let (manager, store) = manager_with_ttl(Duration::hours(1));
        let staff_id = Uuid::new_v4();
        register_staff(&store, staff_id);

        let issued = manager.create_session(staff_id).await.unwrap();
        let before = store
            .find_by_access_hash(&hash_token(&issued.access_token))
            .await
            .unwrap()
            .unwrap();

        manager.validate(&issued.access_token).await.unwrap();
        manager.validate(&issued.access_token).await.unwrap();

        let after = store
            .find_by_access_hash(&hash_token(&issued.access_token))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            before.expires_at, after.expires_at,
            "validation must not slide the expiry window"
        );
        assert!(before.expires_at > before.created_at);
    }
}
