//! The authorization gate.
//!
//! Every call under `/api/v1` passes through [`authorization_gate`] before
//! any handler runs. Each call moves through exactly one of four terminal
//! states: exempt (the operation is reachable without a session),
//! unauthenticated (no usable bearer token, or the session did not
//! validate), forbidden (valid session, insufficient role), or authorized
//! (the call is forwarded with the resolved identity attached). Decisions
//! are never cached; every call re-validates against the store.

use axum::extract::{FromRequestParts, MatchedPath, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use staffd_core::error::CoreError;
use staffd_core::types::{RoleId, StaffId};

use crate::error::AppError;
use crate::state::AppState;

/// The identity the gate attaches to an authorized request.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub staff_id: StaffId,
    pub role_id: RoleId,
    pub role_name: String,
    /// The plaintext bearer token, kept for operations that act on the
    /// session itself (logout).
    pub access_token: String,
}

/// Why no bearer token could be extracted. Both reasons surface to the
/// caller as the same 401; the distinction exists for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingCredential {
    /// The `authorization` header is absent entirely.
    NoHeader,
    /// The header exists but carries no usable bearer token.
    NoToken,
}

impl MissingCredential {
    fn as_str(self) -> &'static str {
        match self {
            MissingCredential::NoHeader => "authorization header is not provided",
            MissingCredential::NoToken => "authorization token is not provided",
        }
    }
}

/// Extract the bearer token from the `authorization` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, MissingCredential> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(MissingCredential::NoHeader)?;

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(MissingCredential::NoToken)?;

    if token.is_empty() {
        return Err(MissingCredential::NoToken);
    }
    Ok(token)
}

/// The operation key the permission table is keyed by: method plus the
/// matched route template, falling back to the raw path when no template
/// matched.
fn operation_key(req: &Request) -> String {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    format!("{} {}", req.method(), path)
}

/// Per-call interceptor enforcing authentication and the role table.
pub async fn authorization_gate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let operation = operation_key(&req);

    if state.permissions.is_exempt(&operation) {
        return Ok(next.run(req).await);
    }

    let token = match bearer_token(req.headers()) {
        Ok(token) => token.to_string(),
        Err(reason) => {
            tracing::debug!(%operation, reason = reason.as_str(), "unauthenticated call");
            return Err(AppError::Core(CoreError::Unauthenticated(
                reason.as_str().to_string(),
            )));
        }
    };

    // Every failure mode here (unknown token, expired session, store
    // failure) is the same credential failure to the caller.
    let auth = match state.sessions.validate(&token).await {
        Ok(auth) => auth,
        Err(err) => {
            tracing::debug!(%operation, error = %err, "token validation failed");
            return Err(AppError::Core(CoreError::Unauthenticated(
                "Invalid or expired token".into(),
            )));
        }
    };

    if !state.permissions.is_allowed(&operation, auth.role_id) {
        return Err(AppError::Core(CoreError::PermissionDenied(format!(
            "role {} does not have permission to access {}",
            auth.role_name, operation
        ))));
    }

    req.extensions_mut().insert(AuthSession {
        staff_id: auth.staff_id,
        role_id: auth.role_id,
        role_name: auth.role_name,
        access_token: token,
    });
    Ok(next.run(req).await)
}

/// Extractor for handlers running behind the gate.
///
/// ```ignore
/// async fn whoami(Authenticated(session): Authenticated) -> AppResult<Json<()>> {
///     tracing::info!(staff_id = %session.staff_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
pub struct Authenticated(pub AuthSession);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthSession>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthenticated(
                    "No authenticated session on request".into(),
                ))
            })
    }
}
