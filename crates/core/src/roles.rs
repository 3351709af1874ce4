//! Well-known role identifiers.
//!
//! These must match the seed data in `crates/db/migrations`. Role sets in the
//! permission table are explicit per operation; no privilege ranking is
//! derived from the numeric order.

use crate::types::RoleId;

pub const ROLE_OWNER: RoleId = 1;
pub const ROLE_ADMIN: RoleId = 2;
pub const ROLE_STAFF: RoleId = 3;
pub const ROLE_VIEWER: RoleId = 4;

/// All roles, in seed order.
pub const ALL_ROLES: [RoleId; 4] = [ROLE_OWNER, ROLE_ADMIN, ROLE_STAFF, ROLE_VIEWER];

/// Resolve a role id to its display name, `"unknown"` for anything else.
pub fn role_name(role_id: RoleId) -> &'static str {
    match role_id {
        ROLE_OWNER => "owner",
        ROLE_ADMIN => "admin",
        ROLE_STAFF => "staff",
        ROLE_VIEWER => "viewer",
        _ => "unknown",
    }
}
