//! End-to-end copilot chat tests: scripted dummy provider, real tool
//! execution, SSE event stream, and message persistence.

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

async fn signup(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"email": "ada@example.com", "password": "hunter2-hunter2"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    body["token"].as_str().unwrap().to_string()
}

/// POST a chat-style request and collect the full SSE body as text.
/// The body stream ends when the server-side turn completes, so collecting
/// it also synchronizes the test with persistence.
async fn post_sse(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(content_type.starts_with("text/event-stream"), "{content_type}");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn chat_requires_auth() {
    let (app, _db) = app_with(DummyProvider::new());
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/copilot/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"messages": []}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn chat_plain_reply_streams_deltas_and_done() {
    let dummy = DummyProvider::new();
    dummy.push_text("Here are three angles for your story.");
    let (app, _db) = app_with(dummy);
    let token = signup(&app).await;

    let (status, sse) = post_sse(
        &app,
        "/api/copilot/chat",
        &token,
        json!({"messages": [{"role": "user", "content": "pitch me angles"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(sse.contains("event: delta"));
    assert!(sse.contains("Here are three angles"));
    assert!(sse.contains("event: done"));
    assert!(!sse.contains("event: error"));
}

#[tokio::test]
async fn chat_tool_loop_streams_and_persists() {
    let dummy = DummyProvider::new();
    dummy.push_tool_call("call_1", "seo_optimizer", json!({"content": "tiny draft"}));
    dummy.push_text("Your SEO audit is ready.");
    let (app, db) = app_with(dummy);
    let token = signup(&app).await;

    // create a conversation to persist into
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/copilot/conversations")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(json!({"title": "SEO help"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let conversation: Value = serde_json::from_slice(&bytes).unwrap();
    let conversation_id = conversation["id"].as_str().unwrap().to_string();

    let (status, sse) = post_sse(
        &app,
        "/api/copilot/chat",
        &token,
        json!({
            "conversation_id": conversation_id,
            "messages": [{"role": "user", "content": "audit my draft"}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(sse.contains("event: tool_call"));
    assert!(sse.contains("seo_optimizer"));
    assert!(sse.contains("event: tool_result"));
    assert!(sse.contains("event: delta"));
    assert!(sse.contains("event: done"));

    // both sides of the exchange are persisted, with tool metadata
    let user = db.user_by_email("ada@example.com").unwrap().unwrap();
    let messages = db.list_messages(&conversation_id, &user.id).unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "user");
    assert_eq!(messages[0].content, "audit my draft");
    assert_eq!(messages[1].role, "assistant");
    assert_eq!(messages[1].content, "Your SEO audit is ready.");
    let metadata = messages[1].metadata.as_ref().unwrap();
    assert_eq!(metadata["toolCalls"][0]["name"], "seo_optimizer");
    assert_eq!(metadata["toolCalls"][0]["ok"], true);
}

#[tokio::test]
async fn advanced_chat_records_interaction() {
    let dummy = DummyProvider::new();
    dummy.push_tool_call(
        "call_1",
        "search_real_news",
        json!({"keywords": ["ai"], "niche": "fintech"}),
    );
    dummy.push_text("Found strong candidates.");
    let (app, db) = app_with(dummy);
    let token = signup(&app).await;

    let (status, sse) = post_sse(
        &app,
        "/api/copilot/advanced-chat",
        &token,
        json!({
            "conversation_id": "widget-session",
            "context": {"niche": "fintech"},
            "messages": [{"role": "user", "content": "find viral news"}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(sse.contains("event: tool_call"));
    assert!(sse.contains("search_real_news"));
    assert!(sse.contains("event: done"));

    // the interaction row was opened with a placeholder and finalized
    let user = db.user_by_email("ada@example.com").unwrap().unwrap();
    let interactions = db.interactions_for_user(&user.id).unwrap();
    assert_eq!(interactions.len(), 1);
    assert_eq!(interactions[0].query, "find viral news");
    assert_eq!(interactions[0].response, "Found strong candidates.");
    assert_eq!(interactions[0].context["niche"], "fintech");
}

#[tokio::test]
async fn newspaper_generation_runs_editorial_tools() {
    let dummy = DummyProvider::new();
    dummy.push_tool_call(
        "call_1",
        "generate_newspaper",
        json!({"total_pages": 3, "main_theme": "Green Energy"}),
    );
    dummy.push_text("Your 3-page edition is ready for review.");
    let (app, _db) = app_with(dummy);
    let token = signup(&app).await;

    let (status, sse) = post_sse(
        &app,
        "/api/newspapers/generate",
        &token,
        json!({"messages": [{"role": "user", "content": "make me a newspaper about green energy"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(sse.contains("event: tool_call"));
    assert!(sse.contains("generate_newspaper"));
    assert!(sse.contains("event: tool_result"));
    assert!(sse.contains("Main Story"));
    assert!(sse.contains("event: done"));
}
