//! Handlers for the `/auth` resource (login, refresh, logout, check,
//! change-password).

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use staffd_core::error::CoreError;
use staffd_db::models::staff::{Staff, StaffResponse};
use staffd_db::repositories::{RoleRepo, StaffRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::gate::Authenticated;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Session expiry as epoch seconds.
    pub expires_at: i64,
    pub staff: StaffResponse,
}

/// Successful refresh response.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Session expiry as epoch seconds.
    pub expires_at: i64,
}

/// Response for `GET /auth/check`.
#[derive(Debug, Serialize)]
pub struct CheckAuthResponse {
    pub authorized: bool,
    pub staff: StaffResponse,
}

/// Acknowledgement payload for logout and change-password.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with login + password. Returns both tokens and the session
/// expiry. The response never distinguishes an unknown login from a wrong
/// password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if input.login.is_empty() || input.password.is_empty() {
        return Err(AppError::Core(CoreError::InvalidInput(
            "login and password are required".into(),
        )));
    }

    let staff = StaffRepo::find_by_login(&state.pool, &input.login)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = state
        .verifier
        .verify(&input.password, &staff.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid_credentials());
    }

    let issued = state.sessions.create_session(staff.id).await?;
    let staff = staff_response(&state, &staff).await?;

    Ok(Json(LoginResponse {
        access_token: issued.access_token,
        refresh_token: issued.refresh_token,
        expires_at: issued.expires_at.timestamp(),
        staff,
    }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for a brand-new session. The old token pair is
/// invalid the instant this succeeds.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<RefreshResponse>> {
    if input.refresh_token.is_empty() {
        return Err(AppError::Core(CoreError::InvalidInput(
            "refresh token is required".into(),
        )));
    }

    let issued = state.sessions.rotate(&input.refresh_token).await?;

    Ok(Json(RefreshResponse {
        access_token: issued.access_token,
        refresh_token: issued.refresh_token,
        expires_at: issued.expires_at.timestamp(),
    }))
}

/// POST /api/v1/auth/logout
///
/// Delete the caller's session. Idempotent at the session-manager level:
/// deleting an absent session is still a success.
pub async fn logout(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
) -> AppResult<Json<SuccessResponse>> {
    state.sessions.invalidate(&session.access_token).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/v1/auth/check
///
/// Report the caller's authorization status and identity. Reaching this
/// handler at all means the gate validated the session.
pub async fn check_auth(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
) -> AppResult<Json<CheckAuthResponse>> {
    let staff = StaffRepo::find_by_id(&state.pool, session.staff_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthenticated("Invalid or expired token".into()))
        })?;

    let staff = staff_response(&state, &staff).await?;
    Ok(Json(CheckAuthResponse {
        authorized: true,
        staff,
    }))
}

/// POST /api/v1/auth/change-password
///
/// Verify the old password, persist the new hash, then revoke every session
/// belonging to the caller -- a password change is a global sign-out.
pub async fn change_password(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<SuccessResponse>> {
    if input.old_password.is_empty() || input.new_password.is_empty() {
        return Err(AppError::Core(CoreError::InvalidInput(
            "old_password and new_password are required".into(),
        )));
    }

    let staff = StaffRepo::find_by_id(&state.pool, session.staff_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthenticated("Invalid or expired token".into()))
        })?;

    // A wrong old password is a credential failure, not an input error.
    let old_valid = state
        .verifier
        .verify(&input.old_password, &staff.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !old_valid {
        return Err(AppError::Core(CoreError::Unauthenticated(
            "invalid old password".into(),
        )));
    }

    let new_hash = state
        .verifier
        .hash(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    StaffRepo::update_password_hash(&state.pool, staff.id, &new_hash).await?;

    // Tokens issued under the old password stop working immediately.
    state.sessions.invalidate_all_for_staff(staff.id).await?;

    Ok(Json(SuccessResponse { success: true }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The uniform credential failure for login.
fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthenticated("Invalid login or password".into()))
}

/// Build the safe staff payload with its role name resolved.
pub(crate) async fn staff_response(state: &AppState, staff: &Staff) -> AppResult<StaffResponse> {
    let role_name = RoleRepo::resolve_name(&state.pool, staff.role_id).await?;
    Ok(StaffResponse {
        id: staff.id,
        login: staff.login.clone(),
        role_id: staff.role_id,
        role_name,
        created_at: staff.created_at,
        updated_at: staff.updated_at,
    })
}
