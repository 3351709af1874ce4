pub mod auth;
pub mod health;
pub mod staff;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login              login (public)
/// /auth/refresh            refresh (public)
/// /auth/logout             logout (requires auth)
/// /auth/check              authorization check (requires auth)
/// /auth/change-password    change password (requires auth)
///
/// /staff                   list (any role), create (owner only)
/// /staff/{id}              get (any role), update (owner/admin),
///                          delete (owner only)
/// ```
///
/// Role requirements are enforced by the authorization gate layered over
/// this tree, not by the routes themselves.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(staff::router())
}
