//! In-memory [`SessionStore`] used by unit tests and no-database setups.
//!
//! One mutex guards all state, so the claim-check-replace sequence of
//! [`SessionStore::rotate`] is serialized exactly like the Postgres
//! implementation's transaction.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::session::SessionRecord;
use crate::store::{RotateOutcome, SessionStore, StaffAuth, StoreError};
use crate::types::{StaffId, Timestamp};

#[derive(Debug, Default)]
struct Inner {
    /// Keyed by access-token digest.
    sessions: HashMap<String, SessionRecord>,
    staff: HashMap<StaffId, StaffAuth>,
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Inner>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a staff identity so `staff_auth` can resolve it.
    pub fn register_staff(&self, auth: StaffAuth) {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.staff.insert(auth.staff_id, auth);
    }

    /// Number of live session rows.
    pub fn session_count(&self) -> usize {
        self.inner.lock().expect("store mutex poisoned").sessions.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, session: &SessionRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if inner.sessions.contains_key(&session.access_token_hash) {
            return Err(StoreError("duplicate access token digest".into()));
        }
        inner
            .sessions
            .insert(session.access_token_hash.clone(), session.clone());
        Ok(())
    }

    async fn find_by_access_hash(
        &self,
        access_hash: &str,
    ) -> Result<Option<SessionRecord>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.sessions.get(access_hash).cloned())
    }

    async fn find_by_refresh_hash(
        &self,
        refresh_hash: &str,
    ) -> Result<Option<SessionRecord>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .sessions
            .values()
            .find(|s| s.refresh_token_hash == refresh_hash)
            .cloned())
    }

    async fn delete_by_access_hash(&self, access_hash: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.sessions.remove(access_hash).is_some())
    }

    async fn delete_all_for_staff(&self, staff_id: StaffId) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let before = inner.sessions.len();
        inner.sessions.retain(|_, s| s.staff_id != staff_id);
        Ok((before - inner.sessions.len()) as u64)
    }

    async fn rotate(
        &self,
        refresh_hash: &str,
        now: Timestamp,
        replacement: &SessionRecord,
    ) -> Result<RotateOutcome, StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");

        let claimed = inner
            .sessions
            .iter()
            .find(|(_, s)| s.refresh_token_hash == refresh_hash)
            .map(|(k, _)| k.clone());

        let Some(key) = claimed else {
            return Ok(RotateOutcome::NotFound);
        };

        let previous = inner
            .sessions
            .remove(&key)
            .ok_or_else(|| StoreError("claimed session vanished".into()))?;

        if now >= previous.expires_at {
            return Ok(RotateOutcome::Expired);
        }

        inner
            .sessions
            .insert(replacement.access_token_hash.clone(), replacement.clone());
        Ok(RotateOutcome::Rotated { previous })
    }

    async fn staff_auth(&self, staff_id: StaffId) -> Result<Option<StaffAuth>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.staff.get(&staff_id).cloned())
    }
}
