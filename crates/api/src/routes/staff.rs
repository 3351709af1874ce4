//! Route definitions for the `/staff` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::staff;
use crate::state::AppState;

/// Routes mounted at `/staff`.
///
/// ```text
/// POST   /staff       -> create_staff (owner only)
/// GET    /staff       -> list_staff (any role)
/// GET    /staff/{id}  -> get_staff (any role)
/// PUT    /staff/{id}  -> update_staff (owner, admin)
/// DELETE /staff/{id}  -> delete_staff (owner only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/staff", post(staff::create_staff).get(staff::list_staff))
        .route(
            "/staff/{id}",
            get(staff::get_staff)
                .put(staff::update_staff)
                .delete(staff::delete_staff),
        )
}
