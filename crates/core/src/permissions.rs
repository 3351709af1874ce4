//! Immutable operation -> role-set permission table.
//!
//! Operations are keyed by `"METHOD /matched/route"` (e.g.
//! `"PUT /api/v1/staff/{id}"`). An operation absent from the table is allowed
//! for Owner only; this is a default-deny policy, not default-allow. The
//! table is built once at startup and shared read-only behind an `Arc`.

use std::collections::{HashMap, HashSet};

use crate::roles::{ALL_ROLES, ROLE_ADMIN, ROLE_OWNER};
use crate::types::RoleId;

/// Fallback role set for operations without an explicit entry.
const OWNER_ONLY: [RoleId; 1] = [ROLE_OWNER];

#[derive(Debug, Clone)]
pub struct PermissionTable {
    allow: HashMap<String, Vec<RoleId>>,
    exempt: HashSet<String>,
}

impl PermissionTable {
    /// Empty table: every operation is Owner-only and nothing is exempt.
    pub fn new() -> Self {
        Self {
            allow: HashMap::new(),
            exempt: HashSet::new(),
        }
    }

    /// The staff service's fixed mapping.
    ///
    /// Login and refresh are the only operations reachable without a prior
    /// session. The gated auth operations (logout, check, change-password)
    /// are open to every role; the staff CRUD entries mirror the management
    /// policy: create/delete Owner, update Owner+Admin, read everyone.
    pub fn staff_service() -> Self {
        Self::new()
            .exempt_operation("POST /api/v1/auth/login")
            .exempt_operation("POST /api/v1/auth/refresh")
            .allow_operation("POST /api/v1/auth/logout", &ALL_ROLES)
            .allow_operation("GET /api/v1/auth/check", &ALL_ROLES)
            .allow_operation("POST /api/v1/auth/change-password", &ALL_ROLES)
            .allow_operation("POST /api/v1/staff", &[ROLE_OWNER])
            .allow_operation("GET /api/v1/staff", &ALL_ROLES)
            .allow_operation("GET /api/v1/staff/{id}", &ALL_ROLES)
            .allow_operation("PUT /api/v1/staff/{id}", &[ROLE_OWNER, ROLE_ADMIN])
            .allow_operation("DELETE /api/v1/staff/{id}", &[ROLE_OWNER])
    }

    /// Add an entry for `operation` allowing exactly `roles`.
    pub fn allow_operation(mut self, operation: &str, roles: &[RoleId]) -> Self {
        self.allow.insert(operation.to_string(), roles.to_vec());
        self
    }

    /// Mark `operation` as reachable without authentication.
    pub fn exempt_operation(mut self, operation: &str) -> Self {
        self.exempt.insert(operation.to_string());
        self
    }

    /// Whether the operation skips authentication entirely.
    pub fn is_exempt(&self, operation: &str) -> bool {
        self.exempt.contains(operation)
    }

    /// Role set permitted to invoke the operation. Unlisted operations fall
    /// back to Owner-only.
    pub fn allowed_roles(&self, operation: &str) -> &[RoleId] {
        self.allow
            .get(operation)
            .map(Vec::as_slice)
            .unwrap_or(&OWNER_ONLY)
    }

    /// Whether `role_id` may invoke the operation.
    pub fn is_allowed(&self, operation: &str, role_id: RoleId) -> bool {
        self.allowed_roles(operation).contains(&role_id)
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::new()
    }
}
