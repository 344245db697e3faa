//! Journalist style CRUD.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::db::StyleUpsert;

use super::auth::CurrentUser;
use super::{internal_error, AppState};

/// GET /api/styles
pub async fn list(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> Response {
    match state.db.list_styles(&user.id) {
        Ok(styles) => (StatusCode::OK, Json(json!({ "styles": styles }))).into_response(),
        Err(e) => internal_error(e),
    }
}

#[derive(Deserialize)]
pub struct UpsertRequest {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tone: Option<String>,
    #[serde(default)]
    style_characteristics: serde_json::Value,
    #[serde(default)]
    training_text_1: Option<String>,
    #[serde(default)]
    training_text_2: Option<String>,
    #[serde(default)]
    training_text_3: Option<String>,
    #[serde(default)]
    is_default: bool,
}

/// POST /api/styles — create, or update when `id` is given. Setting
/// `is_default` clears the user's other defaults.
pub async fn upsert(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<UpsertRequest>,
) -> Response {
    debug!(
        user_id = %user.id,
        updating = req.id.is_some(),
        is_default = req.is_default,
        "style upsert"
    );

    let upsert = StyleUpsert {
        id: req.id,
        name: req.name,
        description: req.description,
        tone: req.tone,
        style_characteristics: req.style_characteristics,
        training_text_1: req.training_text_1.filter(|t| !t.is_empty()),
        training_text_2: req.training_text_2.filter(|t| !t.is_empty()),
        training_text_3: req.training_text_3.filter(|t| !t.is_empty()),
        is_default: req.is_default,
    };

    match state.db.upsert_style(&user.id, upsert) {
        Ok(style) => {
            (StatusCode::OK, Json(json!({ "style": style, "success": true }))).into_response()
        }
        Err(e) => internal_error(e),
    }
}
