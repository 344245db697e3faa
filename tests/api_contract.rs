//! API contract tests — status codes and response shapes per route, driven
//! through the real router with an in-memory database and the dummy provider.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use contentmaster::config::{
    AuthConfig, Config, CopilotConfig, DatabaseConfig, LlmConfig, NewsConfig, ProviderConfig,
    ServerConfig,
};
use contentmaster::db::Db;
use contentmaster::http::{build_router, AppState};
use contentmaster::llm::providers::dummy::DummyProvider;
use contentmaster::llm::router::ModelRouter;
use contentmaster::news::NewsClient;

fn test_config() -> Config {
    let endpoint = ProviderConfig {
        api_base_url: "http://127.0.0.1:1/v1/chat/completions".to_string(),
        model: "gpt-4o".to_string(),
        temperature: 0.7,
        timeout_seconds: 5,
        input_per_million_usd: 2.5,
        output_per_million_usd: 2.5,
    };
    Config {
        service_name: "contentmaster-test".to_string(),
        work_dir: std::env::temp_dir(),
        log_level: "info".to_string(),
        server: ServerConfig { bind: "127.0.0.1:0".to_string() },
        database: DatabaseConfig { path: "unused.db".into() },
        llm: LlmConfig {
            preference: "dummy".to_string(),
            openai: endpoint.clone(),
            groq: endpoint,
        },
        news: NewsConfig { base_url: "https://newsapi.org/v2".to_string(), page_size: 20 },
        copilot: CopilotConfig { max_steps: 5, history_limit: 40 },
        auth: AuthConfig { session_ttl_hours: 24 },
        llm_api_key: None,
        groq_api_key: None,
        newsapi_key: None,
    }
}

fn app_with(dummy: DummyProvider) -> (Router, Db) {
    let config = test_config();
    let db = Db::open_in_memory().expect("db");
    let router = ModelRouter::dummy(dummy);
    let news = NewsClient::new(&config.news, None).expect("news client");
    let state = AppState::new(config, db.clone(), router, news);
    (build_router(state), db)
}

fn app() -> (Router, Db) {
    app_with(DummyProvider::new())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

async fn signup(app: &Router) -> String {
    let (status, body) = send(
        app,
        post(
            "/api/auth/signup",
            None,
            json!({"email": "ada@example.com", "password": "hunter2-hunter2", "full_name": "Ada"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token").to_string()
}

// ── Health & auth ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_is_open() {
    let (app, _db) = app();
    let (status, body) = send(&app, get("/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "contentmaster-test");
}

#[tokio::test]
async fn protected_routes_require_auth() {
    let (app, _db) = app();
    for uri in [
        "/api/articles",
        "/api/styles",
        "/api/seo/projects",
        "/api/copilot/conversations",
        "/api/analytics/dashboard",
        "/api/auth/me",
    ] {
        let (status, _) = send(&app, get(uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn signup_then_me_round_trip() {
    let (app, _db) = app();
    let token = signup(&app).await;

    let (status, body) = send(&app, get("/api/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["plan"], "starter");
    // digests never leak
    assert!(body["user"].get("password_digest").is_none());
}

#[tokio::test]
async fn login_rejects_bad_password() {
    let (app, _db) = app();
    signup(&app).await;

    let (status, _) = send(
        &app,
        post(
            "/api/auth/login",
            None,
            json!({"email": "ada@example.com", "password": "wrong-password"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        post(
            "/api/auth/login",
            None,
            json!({"email": "ada@example.com", "password": "hunter2-hunter2"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let (app, _db) = app();
    signup(&app).await;
    let (status, _) = send(
        &app,
        post(
            "/api/auth/signup",
            None,
            json!({"email": "ada@example.com", "password": "hunter2-hunter2"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// ── Styles ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn style_upsert_and_default_invariant() {
    let (app, _db) = app();
    let token = signup(&app).await;

    let (status, first) = send(
        &app,
        post(
            "/api/styles",
            Some(&token),
            json!({
                "name": "Tech Blogger",
                "tone": "conversational",
                "style_characteristics": {"sentence_length": "short"},
                "training_text_1": "Here's the thing...",
                "is_default": true
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    assert_eq!(first["style"]["is_default"], true);

    let (_, second) = send(
        &app,
        post(
            "/api/styles",
            Some(&token),
            json!({"name": "Formal Reporter", "is_default": true}),
        ),
    )
    .await;
    assert_eq!(second["style"]["is_default"], true);

    let (status, listed) = send(&app, get("/api/styles", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let styles = listed["styles"].as_array().unwrap();
    assert_eq!(styles.len(), 2);
    let defaults: Vec<_> = styles
        .iter()
        .filter(|s| s["is_default"] == json!(true))
        .collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0]["name"], "Formal Reporter");
}

// ── Articles & rewriting ──────────────────────────────────────────────────────

#[tokio::test]
async fn articles_list_is_empty_initially() {
    let (app, _db) = app();
    let token = signup(&app).await;
    let (status, body) = send(&app, get("/api/articles?limit=10", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["articles"], json!([]));
}

#[tokio::test]
async fn rewrite_missing_article_is_404() {
    let (app, _db) = app();
    let token = signup(&app).await;
    let (status, body) = send(
        &app,
        post(
            "/api/articles/rewrite",
            Some(&token),
            json!({"article_id": "nope", "style_id": "also-nope"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn rewrite_happy_path_persists_and_debits() {
    let (app, db) = app();
    let token = signup(&app).await;

    let user = db.user_by_email("ada@example.com").unwrap().unwrap();
    let article_id = db
        .insert_article(
            &user.id,
            &contentmaster::db::NewArticle {
                title: "Original headline".to_string(),
                original_content: Some("Original body text for the article.".to_string()),
                niche: "tech".to_string(),
                status: "discovered".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    let style = db
        .upsert_style(
            &user.id,
            contentmaster::db::StyleUpsert {
                name: "Tech Blogger".to_string(),
                tone: Some("conversational".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    let (status, body) = send(
        &app,
        post(
            "/api/articles/rewrite",
            Some(&token),
            json!({"article_id": article_id, "style_id": style.id, "tone_adjustment": "more_casual"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["rewrite"]["style_applied"], "Tech Blogger");
    assert_eq!(body["rewrite"]["tone_adjustment"], "more_casual");
    assert_eq!(body["metrics"]["improvementScore"], 85);
    // dummy provider echoes the prompt back
    assert!(body["rewrite"]["rewritten_content"]
        .as_str()
        .unwrap()
        .starts_with("[echo]"));

    let article = db.article_by_id(&article_id).unwrap().unwrap();
    assert_eq!(article.status, "rewritten");
    let style = db.style_by_id(&style.id).unwrap().unwrap();
    assert_eq!(style.usage_count, 1);
    let user = db.user_by_id(&user.id).unwrap().unwrap();
    assert!((user.credits_balance - 99.85).abs() < 1e-9);
}

// ── SEO ───────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn seo_projects_crud_and_scoping() {
    let (app, _db) = app();
    let token = signup(&app).await;

    let (status, created) = send(
        &app,
        post(
            "/api/seo/projects",
            Some(&token),
            json!({"name": "Widget Blog", "industry": "manufacturing", "target_audience": "buyers"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let project_id = created["project"]["id"].as_str().unwrap().to_string();

    let (status, listed) = send(&app, get("/api/seo/projects", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["projects"].as_array().unwrap().len(), 1);

    let (status, articles) = send(
        &app,
        get(&format!("/api/seo/projects/{project_id}/articles"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(articles["articles"], json!([]));

    // a second user sees 404, not the project
    let (_, other) = send(
        &app,
        post(
            "/api/auth/signup",
            None,
            json!({"email": "eve@example.com", "password": "hunter2-hunter2"}),
        ),
    )
    .await;
    let other_token = other["token"].as_str().unwrap();
    let (status, _) = send(
        &app,
        get(
            &format!("/api/seo/projects/{project_id}/articles"),
            Some(other_token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn seo_generate_creates_article_with_quality_check() {
    let (app, db) = app();
    let token = signup(&app).await;

    let (_, created) = send(
        &app,
        post(
            "/api/seo/projects",
            Some(&token),
            json!({"name": "Widget Blog", "brand_tone": "friendly"}),
        ),
    )
    .await;
    let project_id = created["project"]["id"].as_str().unwrap().to_string();
    db.add_project_knowledge(&project_id, "Brand", "We sell widgets").unwrap();

    let (status, body) = send(
        &app,
        post(
            "/api/seo/articles/generate",
            Some(&token),
            json!({
                "project_id": project_id,
                "target_keyword": "industrial widgets",
                "include_faq": true
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let article = &body["article"];
    assert_eq!(article["status"], "review");
    assert_eq!(article["target_keyword"], "industrial widgets");
    assert_eq!(article["has_faq"], true);
    assert!(article["word_count"].as_i64().unwrap() > 0);
    // dummy echo has no markdown H1 — title falls back to the keyword
    assert_eq!(article["title"], "industrial widgets");
    assert_eq!(article["slug"], "industrial-widgets");

    let checks = db
        .quality_checks_for_article(article["id"].as_str().unwrap())
        .unwrap();
    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].grammar_errors, 0);
}

#[tokio::test]
async fn seo_generate_unknown_project_is_404() {
    let (app, _db) = app();
    let token = signup(&app).await;
    let (status, _) = send(
        &app,
        post(
            "/api/seo/articles/generate",
            Some(&token),
            json!({"project_id": "ghost", "target_keyword": "x"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Conversations & feedback ──────────────────────────────────────────────────

#[tokio::test]
async fn conversation_crud_contract() {
    let (app, _db) = app();
    let token = signup(&app).await;

    let (status, conversation) = send(
        &app,
        post(
            "/api/copilot/conversations",
            Some(&token),
            json!({"title": "News ideas", "context_type": "copilot"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let conversation_id = conversation["id"].as_str().unwrap().to_string();
    assert_eq!(conversation["title"], "News ideas");

    let (status, listed) = send(&app, get("/api/copilot/conversations", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, messages) = send(
        &app,
        get(
            &format!("/api/copilot/conversations/{conversation_id}/messages"),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(messages, json!([]));
}

#[tokio::test]
async fn feedback_learns_preferences() {
    let (app, db) = app();
    let token = signup(&app).await;

    let (status, body) = send(
        &app,
        post(
            "/api/copilot/feedback",
            Some(&token),
            json!({
                "is_positive": true,
                "context": {"niche": "fintech", "style": "Tech Blogger"}
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["learned"], true);

    let user = db.user_by_email("ada@example.com").unwrap().unwrap();
    assert_eq!(user.copilot_preferences["favorite_niches"], json!(["fintech"]));
    assert_eq!(user.copilot_preferences["preferred_style"], "Tech Blogger");
    assert!(user.copilot_preferences["last_positive_interaction"].is_string());

    // negative feedback records styles to avoid
    send(
        &app,
        post(
            "/api/copilot/feedback",
            Some(&token),
            json!({"is_positive": false, "context": {"style": "Clickbait"}}),
        ),
    )
    .await;
    let user = db.user_by_email("ada@example.com").unwrap().unwrap();
    assert_eq!(user.copilot_preferences["avoid_styles"], json!(["Clickbait"]));
}

// ── News ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn news_endpoints_require_api_key() {
    let (app, _db) = app();
    let token = signup(&app).await;

    let (status, body) = send(
        &app,
        post(
            "/api/news/search",
            Some(&token),
            json!({"keywords": ["rust"], "limit": 5}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("not configured"));

    let (status, _) = send(&app, get("/api/news/trending?category=technology", Some(&token))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// ── Analytics ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_shape() {
    let (app, _db) = app();
    let token = signup(&app).await;

    let (status, body) = send(&app, get("/api/analytics/dashboard", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["plan"], "starter");
    assert_eq!(data["credits"]["balance"], 100.0);
    assert_eq!(data["articles"]["total"], 0);
    assert!(data["revenue"]["growth"].is_string());
}
