use std::sync::Arc;

use staffd_core::permissions::PermissionTable;
use staffd_core::session::SessionManager;

use crate::auth::password::CredentialVerifier;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The permission
/// table is immutable after construction and read without synchronization.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (staff and role CRUD).
    pub pool: staffd_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Session lifecycle manager over the injected session store.
    pub sessions: Arc<SessionManager>,
    /// Password hashing and verification.
    pub verifier: Arc<CredentialVerifier>,
    /// Operation -> role-set table consulted by the authorization gate.
    pub permissions: Arc<PermissionTable>,
}
