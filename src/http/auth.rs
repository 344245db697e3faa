//! Session-token authentication.
//!
//! Signup/login issue opaque bearer tokens (32 random bytes, base64url).
//! Only the sha256 digest of a token is stored; the extractor resolves the
//! digest back to a user and rejects expired sessions with 401.

use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::Engine as _;
use chrono::{Duration, Utc};
use rand_core::{OsRng, RngCore};
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::db::User;

use super::{internal_error, json_error, AppState};

// ── Token & digest helpers ────────────────────────────────────────────────────

/// Deterministic per-user password digest: sha256 over `email:password`.
pub fn password_digest(email: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fresh opaque session token (returned to the client once) and its digest
/// (the only thing persisted).
pub fn new_session_token() -> (String, String) {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes);
    let digest = token_digest(&token);
    (token, digest)
}

pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

// ── Extractor ─────────────────────────────────────────────────────────────────

/// Resolved caller. Handlers take `CurrentUser(user)` to require auth.
pub struct CurrentUser(pub User);

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, json_error("unauthorized", "Unauthorized")).into_response()
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .filter(|t| !t.is_empty());

        let Some(token) = token else {
            return Err(unauthorized());
        };

        match state.db.user_by_session(&token_digest(token)) {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(unauthorized()),
            Err(e) => Err(internal_error(e)),
        }
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    email: String,
    password: String,
    #[serde(default)]
    full_name: Option<String>,
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Response {
    if req.email.is_empty() || !req.email.contains('@') || req.password.len() < 8 {
        return (
            StatusCode::BAD_REQUEST,
            json_error("invalid_request", "valid email and password (min 8 chars) required"),
        )
            .into_response();
    }

    if let Ok(Some(_)) = state.db.user_by_email(&req.email) {
        return (
            StatusCode::CONFLICT,
            json_error("conflict", "email already registered"),
        )
            .into_response();
    }

    let digest = password_digest(&req.email, &req.password);
    let full_name = req.full_name.unwrap_or_else(|| req.email.clone());
    let user = match state.db.create_user(&req.email, &digest, &full_name) {
        Ok(user) => user,
        Err(e) => return internal_error(e),
    };

    info!(user_id = %user.id, "user signed up");
    match issue_session(&state, &user) {
        Ok(token) => (StatusCode::OK, Json(json!({ "user": user, "token": token }))).into_response(),
        Err(e) => internal_error(e),
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

/// POST /api/auth/login
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    let user = match state.db.user_by_email(&req.email) {
        Ok(Some(user)) => user,
        Ok(None) => return unauthorized(),
        Err(e) => return internal_error(e),
    };

    if user.password_digest != password_digest(&req.email, &req.password) {
        return unauthorized();
    }

    match issue_session(&state, &user) {
        Ok(token) => (StatusCode::OK, Json(json!({ "user": user, "token": token }))).into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /api/auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> Response {
    (StatusCode::OK, Json(json!({ "user": user }))).into_response()
}

fn issue_session(state: &AppState, user: &User) -> Result<String, crate::error::AppError> {
    let (token, digest) = new_session_token();
    let expires_at =
        (Utc::now() + Duration::hours(state.config.auth.session_ttl_hours)).to_rfc3339();
    state.db.create_auth_session(&user.id, &digest, &expires_at)?;
    Ok(token)
}
