//! HTTP surface — axum router, shared state, and the route handlers.
//!
//! ## URL layout
//!
//! ```text
//! GET  /api/health
//! POST /api/auth/signup
//! POST /api/auth/login
//! GET  /api/auth/me
//! GET  /api/articles
//! POST /api/articles/rewrite
//! GET  /api/styles
//! POST /api/styles
//! POST /api/news/search
//! GET  /api/news/trending
//! GET  /api/seo/projects
//! POST /api/seo/projects
//! GET  /api/seo/projects/{id}/articles
//! POST /api/seo/articles/generate
//! GET  /api/copilot/conversations
//! POST /api/copilot/conversations
//! GET  /api/copilot/conversations/{id}/messages
//! POST /api/copilot/chat            (SSE)
//! POST /api/copilot/advanced-chat   (SSE)
//! POST /api/copilot/feedback
//! POST /api/newspapers/generate     (SSE)
//! GET  /api/analytics/dashboard
//! ```

pub mod articles;
pub mod auth;
pub mod chat;
pub mod conversations;
pub mod dashboard;
pub mod news;
pub mod seo;
pub mod styles;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::copilot::ChatEngine;
use crate::db::Db;
use crate::error::AppError;
use crate::llm::router::ModelRouter;
use crate::news::NewsClient;

// ── Shared request state ──────────────────────────────────────────────────────

/// Axum router state injected into every handler via [`axum::extract::State`].
///
/// Cheap to clone — all fields are reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub model_router: Arc<ModelRouter>,
    pub news: NewsClient,
    pub engine: Arc<ChatEngine>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, db: Db, model_router: ModelRouter, news: NewsClient) -> Self {
        let engine = Arc::new(ChatEngine::new(config.copilot.max_steps));
        Self {
            db,
            model_router: Arc::new(model_router),
            news,
            engine,
            config: Arc::new(config),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a JSON error response body.
pub(crate) fn json_error(code: &str, msg: impl std::fmt::Display) -> Json<serde_json::Value> {
    Json(json!({ "error": code, "message": format!("{msg}") }))
}

/// Uniform downstream/database failure mapping: 500 with the message surfaced.
pub(crate) fn internal_error(e: AppError) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, json_error("internal", e)).into_response()
}

pub(crate) fn not_found(msg: &str) -> Response {
    (StatusCode::NOT_FOUND, json_error("not_found", msg)).into_response()
}

// ── Router ────────────────────────────────────────────────────────────────────

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health",                          get(health))
        .route("/api/auth/signup",                     post(auth::signup))
        .route("/api/auth/login",                      post(auth::login))
        .route("/api/auth/me",                         get(auth::me))
        .route("/api/articles",                        get(articles::list))
        .route("/api/articles/rewrite",                post(articles::rewrite))
        .route("/api/styles",                          get(styles::list).post(styles::upsert))
        .route("/api/news/search",                     post(news::search))
        .route("/api/news/trending",                   get(news::trending))
        .route("/api/seo/projects",                    get(seo::list_projects).post(seo::create_project))
        .route("/api/seo/projects/{id}/articles",      get(seo::project_articles))
        .route("/api/seo/articles/generate",           post(seo::generate_article))
        .route("/api/copilot/conversations",           get(conversations::list).post(conversations::create))
        .route("/api/copilot/conversations/{id}/messages", get(conversations::messages))
        .route("/api/copilot/chat",                    post(chat::chat))
        .route("/api/copilot/advanced-chat",           post(chat::advanced_chat))
        .route("/api/copilot/feedback",                post(conversations::feedback))
        .route("/api/newspapers/generate",             post(chat::newspaper))
        .route("/api/analytics/dashboard",             get(dashboard::dashboard))
        .with_state(state)
}

/// GET /api/health
async fn health(axum::extract::State(state): axum::extract::State<AppState>) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": state.config.service_name })),
    )
        .into_response()
}

// ── Server loop ───────────────────────────────────────────────────────────────

pub async fn serve(state: AppState, shutdown: CancellationToken) -> Result<(), AppError> {
    let bind = state.config.server.bind.clone();
    let router = build_router(state);

    let listener = TcpListener::bind(&bind)
        .await
        .map_err(|e| AppError::Server(format!("bind failed on {bind}: {e}")))?;

    info!(%bind, "http server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Server(format!("server error: {e}")))?;

    info!("http server shut down");
    Ok(())
}
