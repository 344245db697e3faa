//! Executive dashboard endpoint.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::analytics;

use super::auth::CurrentUser;
use super::{internal_error, AppState};

/// GET /api/analytics/dashboard
pub async fn dashboard(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> Response {
    match analytics::dashboard(&state.db, &user) {
        Ok(data) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": data })),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}
