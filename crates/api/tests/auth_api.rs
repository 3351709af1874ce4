//! HTTP-level integration tests for the auth endpoints: login, refresh,
//! logout, check, and change-password.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, post_json_auth};
use sqlx::PgPool;

use staffd_api::auth::password::CredentialVerifier;
use staffd_core::roles::ROLE_ADMIN;
use staffd_core::types::RoleId;
use staffd_db::models::staff::{CreateStaff, Staff};
use staffd_db::repositories::StaffRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a staff member directly in the database and return the row plus
/// the plaintext password used.
async fn create_test_staff(pool: &PgPool, login: &str, role_id: RoleId) -> (Staff, String) {
    let password = "test_password_123!";
    let hashed = CredentialVerifier::new(1)
        .hash(password)
        .expect("hashing should succeed");
    let staff = StaffRepo::create(
        pool,
        &CreateStaff {
            login: login.to_string(),
            password_hash: hashed,
            role_id,
        },
    )
    .await
    .expect("staff creation should succeed");
    (staff, password.to_string())
}

/// Log in via the API and return the JSON response.
async fn login_staff(app: axum::Router, login: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "login": login, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns both tokens, the expiry, and the staff summary.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let (staff, password) = create_test_staff(&pool, "loginuser", ROLE_ADMIN).await;
    let app = common::build_test_app(pool);

    let json = login_staff(app, "loginuser", &password).await;

    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert!(json["expires_at"].is_number());
    assert_eq!(json["staff"]["id"], staff.id.to_string());
    assert_eq!(json["staff"]["login"], "loginuser");
    assert_eq!(json["staff"]["role_name"], "admin");
    // The password hash never leaves the service.
    assert!(json["staff"].get("password_hash").is_none());
}

/// A wrong password and an unknown login produce byte-identical failures.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_failures_are_uniform(pool: PgPool) {
    let (_staff, _password) = create_test_staff(&pool, "present", ROLE_ADMIN).await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "login": "present", "password": "incorrect" });
    let wrong_pw = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(wrong_pw.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "login": "ghost", "password": "whatever" });
    let no_user = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(no_user.status(), StatusCode::UNAUTHORIZED);

    // The two failure modes must be indistinguishable to the caller.
    assert_eq!(body_json(wrong_pw).await, body_json(no_user).await);
}

/// Empty credentials are an input error, not a credential failure.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_empty_credentials(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "login": "", "password": "" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

/// Refresh rotates the session: new tokens come back and the old pair dies.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_session(pool: PgPool) {
    let (_staff, password) = create_test_staff(&pool, "refresher", ROLE_ADMIN).await;

    let login_json = login_staff(common::build_test_app(pool.clone()), "refresher", &password).await;
    let old_access = login_json["access_token"].as_str().unwrap();
    let old_refresh = login_json["refresh_token"].as_str().unwrap();

    let body = serde_json::json!({ "refresh_token": old_refresh });
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_ne!(json["refresh_token"].as_str().unwrap(), old_refresh);

    // The pre-rotation access token is no longer valid.
    let stale = get_auth(common::build_test_app(pool.clone()), "/api/v1/auth/check", old_access).await;
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);

    // Neither is the consumed refresh token.
    let body = serde_json::json!({ "refresh_token": old_refresh });
    let reused = post_json(common::build_test_app(pool), "/api/v1/auth/refresh", body).await;
    assert_eq!(reused.status(), StatusCode::UNAUTHORIZED);
}

/// Refreshing with a garbage token returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_invalid_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "refresh_token": "not-a-real-token" });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// The rotated access token works where the stale one does not.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refreshed_token_is_usable(pool: PgPool) {
    let (_staff, password) = create_test_staff(&pool, "continuity", ROLE_ADMIN).await;

    let login_json = login_staff(common::build_test_app(pool.clone()), "continuity", &password).await;
    let body = serde_json::json!({ "refresh_token": login_json["refresh_token"] });
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/auth/refresh", body).await;
    let json = body_json(response).await;
    let new_access = json["access_token"].as_str().unwrap();

    let check = get_auth(common::build_test_app(pool), "/api/v1/auth/check", new_access).await;
    assert_eq!(check.status(), StatusCode::OK);
    let check_json = body_json(check).await;
    assert_eq!(check_json["authorized"], true);
    assert_eq!(check_json["staff"]["login"], "continuity");
}

// ---------------------------------------------------------------------------
// Logout and check
// ---------------------------------------------------------------------------

/// Logout revokes the session; the token no longer passes the gate.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_token(pool: PgPool) {
    let (_staff, password) = create_test_staff(&pool, "leaver", ROLE_ADMIN).await;

    let login_json = login_staff(common::build_test_app(pool.clone()), "leaver", &password).await;
    let access = login_json["access_token"].as_str().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/logout",
        access,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    let after = get_auth(common::build_test_app(pool), "/api/v1/auth/check", access).await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Change password
// ---------------------------------------------------------------------------

/// Changing the password signs the staff member out everywhere and the old
/// password stops working.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_change_password_global_sign_out(pool: PgPool) {
    let (_staff, password) = create_test_staff(&pool, "rotator", ROLE_ADMIN).await;

    // Two independent sessions for the same staff member.
    let first = login_staff(common::build_test_app(pool.clone()), "rotator", &password).await;
    let second = login_staff(common::build_test_app(pool.clone()), "rotator", &password).await;
    let first_access = first["access_token"].as_str().unwrap();
    let second_access = second["access_token"].as_str().unwrap();

    let body = serde_json::json!({
        "old_password": password,
        "new_password": "brand_new_secret_456!",
    });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/change-password",
        first_access,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Both sessions are gone, including the one that made the change.
    for token in [first_access, second_access] {
        let check = get_auth(common::build_test_app(pool.clone()), "/api/v1/auth/check", token).await;
        assert_eq!(check.status(), StatusCode::UNAUTHORIZED);
    }

    // The old password no longer authenticates; the new one does.
    let body = serde_json::json!({ "login": "rotator", "password": password });
    let old = post_json(common::build_test_app(pool.clone()), "/api/v1/auth/login", body).await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);

    login_staff(common::build_test_app(pool), "rotator", "brand_new_secret_456!").await;
}

/// Changing the password with a wrong old password is a credential failure
/// and leaves the session alive.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_change_password_wrong_old(pool: PgPool) {
    let (_staff, password) = create_test_staff(&pool, "careless", ROLE_ADMIN).await;

    let login_json = login_staff(common::build_test_app(pool.clone()), "careless", &password).await;
    let access = login_json["access_token"].as_str().unwrap();

    let body = serde_json::json!({
        "old_password": "not-the-password",
        "new_password": "whatever_789!",
    });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/change-password",
        access,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let check = get_auth(common::build_test_app(pool), "/api/v1/auth/check", access).await;
    assert_eq!(check.status(), StatusCode::OK);
}
