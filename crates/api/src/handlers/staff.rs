//! Handlers for the `/staff` resource (CRUD + listing).
//!
//! Role requirements are enforced by the authorization gate before any of
//! these handlers run; the handlers themselves only validate input and talk
//! to the repositories.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use staffd_core::error::CoreError;
use staffd_core::types::{RoleId, StaffId};
use staffd_db::models::staff::{CreateStaff, StaffFilter, StaffResponse, UpdateStaff};
use staffd_db::repositories::{RoleRepo, StaffRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::auth::staff_response;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /staff`.
#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub login: String,
    pub password: String,
    pub role_id: RoleId,
}

/// Query parameters for `GET /staff`.
#[derive(Debug, Default, Deserialize)]
pub struct ListStaffQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub role_id: Option<RoleId>,
}

/// Paged listing response.
#[derive(Debug, Serialize)]
pub struct StaffListResponse {
    pub staff: Vec<StaffResponse>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    /// Number of pages at this page size.
    pub page_count: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/staff
pub async fn create_staff(
    State(state): State<AppState>,
    Json(input): Json<CreateStaffRequest>,
) -> AppResult<(StatusCode, Json<StaffResponse>)> {
    if input.login.is_empty() || input.password.is_empty() {
        return Err(AppError::Core(CoreError::InvalidInput(
            "login and password are required".into(),
        )));
    }
    if RoleRepo::find_by_id(&state.pool, input.role_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::InvalidInput(format!(
            "Unknown role_id: {}",
            input.role_id
        ))));
    }

    let password_hash = state
        .verifier
        .hash(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let staff = StaffRepo::create(
        &state.pool,
        &CreateStaff {
            login: input.login,
            password_hash,
            role_id: input.role_id,
        },
    )
    .await?;

    let body = staff_response(&state, &staff).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// GET /api/v1/staff
pub async fn list_staff(
    State(state): State<AppState>,
    Query(query): Query<ListStaffQuery>,
) -> AppResult<Json<StaffListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(10).clamp(1, 100);

    let filter = StaffFilter {
        page,
        page_size,
        search_term: query.search.filter(|s| !s.is_empty()),
        role_id: query.role_id,
    };
    let (rows, total) = StaffRepo::list(&state.pool, &filter).await?;

    let mut staff = Vec::with_capacity(rows.len());
    for row in &rows {
        staff.push(staff_response(&state, row).await?);
    }

    // page_size is clamped to >= 1 above, so this division is safe.
    let page_count = (total + page_size - 1) / page_size;

    Ok(Json(StaffListResponse {
        staff,
        total,
        page,
        page_size,
        page_count,
    }))
}

/// GET /api/v1/staff/{id}
pub async fn get_staff(
    State(state): State<AppState>,
    Path(id): Path<StaffId>,
) -> AppResult<Json<StaffResponse>> {
    let staff = StaffRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "staff",
            id,
        }))?;

    let body = staff_response(&state, &staff).await?;
    Ok(Json(body))
}

/// PUT /api/v1/staff/{id}
pub async fn update_staff(
    State(state): State<AppState>,
    Path(id): Path<StaffId>,
    Json(input): Json<UpdateStaff>,
) -> AppResult<Json<StaffResponse>> {
    if let Some(role_id) = input.role_id {
        if RoleRepo::find_by_id(&state.pool, role_id).await?.is_none() {
            return Err(AppError::Core(CoreError::InvalidInput(format!(
                "Unknown role_id: {role_id}"
            ))));
        }
    }
    if let Some(login) = &input.login {
        if login.is_empty() {
            return Err(AppError::Core(CoreError::InvalidInput(
                "login must not be empty".into(),
            )));
        }
    }

    let staff = StaffRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "staff",
            id,
        }))?;

    let body = staff_response(&state, &staff).await?;
    Ok(Json(body))
}

/// DELETE /api/v1/staff/{id}
///
/// The sessions foreign key cascades, so every session belonging to the
/// deleted staff member disappears with the row.
pub async fn delete_staff(
    State(state): State<AppState>,
    Path(id): Path<StaffId>,
) -> AppResult<StatusCode> {
    let deleted = StaffRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "staff",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
