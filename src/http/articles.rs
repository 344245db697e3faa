//! Article listing and style rewriting.

use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::llm::router::TaskType;
use crate::pricing::Operation;
use crate::scoring;

use super::auth::CurrentUser;
use super::{internal_error, json_error, not_found, AppState};

/// Per-request ceiling on LLM-backed handlers.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

// ── GET /api/articles ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    status: Option<String>,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    50
}

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Response {
    match state
        .db
        .list_articles(&user.id, query.status.as_deref(), query.limit)
    {
        Ok(articles) => (StatusCode::OK, Json(json!({ "articles": articles }))).into_response(),
        Err(e) => internal_error(e),
    }
}

// ── POST /api/articles/rewrite ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RewriteRequest {
    article_id: String,
    style_id: String,
    #[serde(default)]
    target_audience: Option<String>,
    #[serde(default)]
    tone_adjustment: Option<String>,
    #[serde(default)]
    provider: Option<String>,
}

pub async fn rewrite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<RewriteRequest>,
) -> Response {
    let article = state.db.article_by_id(&req.article_id);
    let style = state.db.style_by_id(&req.style_id);

    let (article, style) = match (article, style) {
        (Ok(Some(article)), Ok(Some(style))) => (article, style),
        (Ok(_), Ok(_)) => return not_found("Article or style not found"),
        (Err(e), _) | (_, Err(e)) => return internal_error(e),
    };

    let prompt = format!(
        "Rewrite this article in the style of a {name}.\n\n\
         Style Description: {description}\n\
         Tone: {tone}\n\
         Style Characteristics: {characteristics}\n\
         Example: {example}\n\n\
         Target Audience: {audience}\n\
         Tone Adjustment: {adjustment}\n\n\
         Original Article:\n\
         Title: {title}\n\
         Content: {content}\n\n\
         Instructions:\n\
         1. Maintain all factual information\n\
         2. Apply the journalist style naturally\n\
         3. Adjust tone as specified\n\
         4. Keep the article engaging and professional\n\
         5. Optimize for readability\n\n\
         Rewritten Article:",
        name = style.name,
        description = style.description.as_deref().unwrap_or(""),
        tone = style.tone.as_deref().unwrap_or(""),
        characteristics = style.style_characteristics,
        example = style.training_text_1.as_deref().unwrap_or(""),
        audience = req.target_audience.as_deref().unwrap_or("general readers"),
        adjustment = req.tone_adjustment.as_deref().unwrap_or("none"),
        title = article.title,
        content = article.original_content.as_deref().unwrap_or(""),
    );

    let selection = state
        .model_router
        .select(TaskType::NewsRewrite, req.provider.as_deref());

    let rewritten = match tokio::time::timeout(
        GENERATION_TIMEOUT,
        selection.provider.complete(&prompt, None),
    )
    .await
    {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(article_id = %article.id, error = %e, "rewrite generation failed");
            return internal_error(crate::error::AppError::Llm(e.to_string()));
        }
        Err(_) => {
            return (
                StatusCode::GATEWAY_TIMEOUT,
                json_error("timeout", "LLM request timed out"),
            )
                .into_response();
        }
    };

    let words = scoring::word_count(&rewritten);
    let reading_time = scoring::reading_time_minutes(words);
    let suggestions = vec![
        "Applied professional journalist style".to_string(),
        "Optimized paragraph structure".to_string(),
        "Enhanced storytelling elements".to_string(),
        "Improved readability and engagement".to_string(),
    ];

    let rewrite = match state.db.insert_rewrite(
        &article.id,
        &style.id,
        &rewritten,
        &style.name,
        req.tone_adjustment.as_deref().unwrap_or("none"),
        8.5,
        words as i64,
        reading_time as i64,
        85,
        &suggestions,
    ) {
        Ok(rewrite) => rewrite,
        Err(e) => return internal_error(e),
    };

    if let Err(e) = state.db.set_article_status(&article.id, "rewritten") {
        warn!(article_id = %article.id, error = %e, "status update failed");
    }
    if let Err(e) = state.db.bump_style_usage(&style.id) {
        warn!(style_id = %style.id, error = %e, "usage bump failed");
    }
    if let Err(e) = state
        .db
        .debit_credits(&user.id, Operation::RewriteNews.credit_cost())
    {
        warn!(user_id = %user.id, error = %e, "credit debit failed");
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "rewrite": rewrite,
            "metrics": {
                "wordCount": words,
                "readingTime": format!("{reading_time} min"),
                "improvementScore": 85,
            }
        })),
    )
        .into_response()
}
