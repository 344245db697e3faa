//! Conversation CRUD and copilot feedback learning.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::auth::CurrentUser;
use super::{internal_error, AppState};

// ── POST /api/copilot/conversations ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    context_type: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateRequest>,
) -> Response {
    info!(user_id = %user.id, "creating conversation");
    match state.db.create_conversation(
        &user.id,
        req.title.as_deref(),
        req.description.as_deref(),
        req.context_type.as_deref(),
    ) {
        Ok(conversation) => (StatusCode::OK, Json(conversation)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /api/copilot/conversations
pub async fn list(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> Response {
    match state.db.list_conversations(&user.id) {
        Ok(conversations) => (StatusCode::OK, Json(conversations)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /api/copilot/conversations/{id}/messages
pub async fn messages(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(conversation_id): Path<String>,
) -> Response {
    match state.db.list_messages(&conversation_id, &user.id) {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(e) => internal_error(e),
    }
}

// ── POST /api/copilot/feedback ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    #[allow(dead_code)]
    message_id: Option<String>,
    is_positive: bool,
    #[serde(default)]
    #[allow(dead_code)]
    feedback_text: Option<String>,
    #[serde(default)]
    context: Option<Value>,
}

/// Preference learning: positive feedback promotes the niche/style from the
/// interaction context, negative feedback marks styles to avoid.
pub async fn feedback(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<FeedbackRequest>,
) -> Response {
    let context = req.context.unwrap_or(Value::Null);
    let mut prefs = match user.copilot_preferences.clone() {
        Value::Object(map) => Value::Object(map),
        _ => json!({}),
    };

    if req.is_positive {
        if let Some(niche) = context.get("niche").and_then(Value::as_str) {
            push_unique(&mut prefs, "favorite_niches", niche);
        }
        if let Some(style) = context.get("style").and_then(Value::as_str) {
            prefs["preferred_style"] = json!(style);
        }
        prefs["last_positive_interaction"] = json!(Utc::now().to_rfc3339());
    } else if let Some(style) = context.get("style").and_then(Value::as_str) {
        push_unique(&mut prefs, "avoid_styles", style);
    }

    match state.db.update_preferences(&user.id, &prefs) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "learned": true })),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}

/// Append `value` to the string array at `key`, deduplicating.
fn push_unique(prefs: &mut Value, key: &str, value: &str) {
    let list = prefs
        .as_object_mut()
        .map(|map| map.entry(key).or_insert_with(|| json!([])))
        .and_then(Value::as_array_mut);
    if let Some(list) = list {
        if !list.iter().any(|v| v.as_str() == Some(value)) {
            list.push(json!(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_unique_deduplicates() {
        let mut prefs = json!({});
        push_unique(&mut prefs, "favorite_niches", "fintech");
        push_unique(&mut prefs, "favorite_niches", "fintech");
        push_unique(&mut prefs, "favorite_niches", "ai");
        assert_eq!(prefs["favorite_niches"], json!(["fintech", "ai"]));
    }

    #[test]
    fn push_unique_tolerates_wrong_shape() {
        let mut prefs = json!({"favorite_niches": "not-a-list"});
        // existing non-array value stays untouched rather than panicking
        push_unique(&mut prefs, "favorite_niches", "ai");
        assert_eq!(prefs["favorite_niches"], json!("not-a-list"));
    }
}
