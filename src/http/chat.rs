//! Streaming chat endpoints.
//!
//! All three endpoints share the same shape: validate, persist the inbound
//! user message, spawn the chat turn, and stream [`ChatEvent`]s to the client
//! as server-sent events. The turn keeps running to completion (and persists
//! its results) even if the client disconnects mid-stream.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_stream::{wrappers::ReceiverStream, StreamExt};
use tracing::{error, warn};

use crate::copilot::{prompts, ChatEvent};
use crate::db::User;
use crate::llm::router::TaskType;
use crate::llm::ChatMessage;
use crate::tools::{ToolContext, Toolset};

use super::auth::CurrentUser;
use super::AppState;

const EVENT_BUFFER: usize = 64;

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Clone)]
pub struct IncomingMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    messages: Vec<IncomingMessage>,
    #[serde(default)]
    conversation_id: Option<String>,
}

#[derive(Deserialize)]
pub struct AdvancedChatRequest {
    messages: Vec<IncomingMessage>,
    #[serde(default)]
    conversation_id: Option<String>,
    #[serde(default)]
    context: Option<Value>,
}

#[derive(Deserialize)]
pub struct NewspaperRequest {
    messages: Vec<IncomingMessage>,
}

// ── SSE plumbing ──────────────────────────────────────────────────────────────

fn to_sse(event: ChatEvent) -> Event {
    match event {
        ChatEvent::ToolCall { id, name, arguments } => Event::default()
            .event("tool_call")
            .data(json!({ "id": id, "name": name, "arguments": arguments }).to_string()),
        ChatEvent::ToolResult { id, name, ok, data } => Event::default()
            .event("tool_result")
            .data(json!({ "id": id, "name": name, "ok": ok, "data": data }).to_string()),
        ChatEvent::Delta { text } => Event::default()
            .event("delta")
            .data(json!({ "text": text }).to_string()),
        ChatEvent::Done { model } => Event::default()
            .event("done")
            .data(json!({ "model": model }).to_string()),
        ChatEvent::Error { message } => Event::default()
            .event("error")
            .data(json!({ "message": message }).to_string()),
    }
}

fn sse_response(rx: mpsc::Receiver<ChatEvent>) -> Response {
    let stream = ReceiverStream::new(rx).map(|ev| Ok::<Event, Infallible>(to_sse(ev)));
    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}

fn to_history(messages: &[IncomingMessage]) -> Vec<ChatMessage> {
    messages
        .iter()
        .map(|m| ChatMessage {
            role: m.role.clone(),
            content: m.content.clone(),
            tool_calls: None,
            tool_call_id: None,
        })
        .collect()
}

fn last_user_content(messages: &[IncomingMessage]) -> Option<String> {
    messages
        .last()
        .filter(|m| m.role == "user")
        .map(|m| m.content.clone())
}

/// Persist the inbound user message when it targets a conversation the
/// caller owns. Missing/foreign conversations are skipped, not fatal.
fn persist_user_message(state: &AppState, user: &User, conversation_id: &str, content: &str) {
    match state.db.conversation_by_id(conversation_id) {
        Ok(Some(c)) if c.user_id == user.id => {
            if let Err(e) = state
                .db
                .insert_message(conversation_id, &user.id, "user", content, None)
            {
                warn!(%conversation_id, error = %e, "failed to persist user message");
            }
        }
        Ok(_) => warn!(%conversation_id, "conversation not found for message persistence"),
        Err(e) => warn!(%conversation_id, error = %e, "conversation lookup failed"),
    }
}

// ── POST /api/copilot/chat ────────────────────────────────────────────────────

pub async fn chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ChatRequest>,
) -> Response {
    // Clients usually replay the full conversation themselves. When only the
    // newest message arrives, rebuild the window from stored history.
    let mut history = Vec::new();
    if let Some(conversation_id) = &req.conversation_id {
        if req.messages.len() <= 1 {
            match state
                .db
                .recent_messages(conversation_id, state.config.copilot.history_limit)
            {
                Ok(stored) => history.extend(stored.into_iter().map(|m| ChatMessage {
                    role: m.role,
                    content: m.content,
                    tool_calls: None,
                    tool_call_id: None,
                })),
                Err(e) => warn!(%conversation_id, error = %e, "history load failed"),
            }
        }
    }

    if let (Some(conversation_id), Some(content)) =
        (&req.conversation_id, last_user_content(&req.messages))
    {
        persist_user_message(&state, &user, conversation_id, &content);
    }

    history.extend(to_history(&req.messages));
    let selection = state.model_router.select(TaskType::ChatSimple, None);
    let ctx = ToolContext {
        db: state.db.clone(),
        news: state.news.clone(),
        user: user.clone(),
        context: Value::Null,
    };

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let engine = state.engine.clone();
    let conversation_id = req.conversation_id.clone();
    let db = state.db.clone();

    tokio::spawn(async move {
        match engine
            .run_turn(
                &selection,
                prompts::CHAT_SYSTEM_PROMPT,
                &history,
                Toolset::Chat,
                &ctx,
                &tx,
            )
            .await
        {
            Ok(outcome) => {
                if let Some(conversation_id) = &conversation_id {
                    if !outcome.text.is_empty() {
                        let metadata = (!outcome.tool_calls.is_empty())
                            .then(|| json!({ "toolCalls": outcome.tool_calls }));
                        if let Err(e) = db.insert_message(
                            conversation_id,
                            &user.id,
                            "assistant",
                            &outcome.text,
                            metadata.as_ref(),
                        ) {
                            warn!(%conversation_id, error = %e, "failed to persist assistant message");
                        }
                    }
                }
                let _ = tx.send(ChatEvent::Done { model: selection.name.clone() }).await;
            }
            Err(e) => {
                error!(error = %e, "chat turn failed");
                let _ = tx
                    .send(ChatEvent::Error { message: "Failed to process request".to_string() })
                    .await;
            }
        }
    });

    sse_response(rx)
}

// ── POST /api/copilot/advanced-chat ───────────────────────────────────────────

pub async fn advanced_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<AdvancedChatRequest>,
) -> Response {
    let context = req.context.unwrap_or_else(|| json!({}));

    // Reuse the caller's session when the client passed one; otherwise open a
    // session for conversations so interactions have an anchor.
    let session_id = match context.get("session_id").and_then(Value::as_str) {
        Some(id) => Some(id.to_string()),
        None if req.conversation_id.is_some() => {
            match state.db.create_copilot_session(&user.id, &context) {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(error = %e, "failed to create copilot session");
                    None
                }
            }
        }
        None => None,
    };

    let interaction_id = match (&session_id, last_user_content(&req.messages)) {
        (Some(session_id), Some(query)) => state
            .db
            .insert_interaction(session_id, &user.id, &query, "Processing...", &context)
            .map_err(|e| warn!(error = %e, "failed to record interaction"))
            .ok(),
        _ => None,
    };

    let system_prompt = prompts::advanced_system_prompt(&user, &context);
    let history = to_history(&req.messages);
    let selection = state.model_router.select(TaskType::Analysis, None);
    let ctx = ToolContext {
        db: state.db.clone(),
        news: state.news.clone(),
        user: user.clone(),
        context: context.clone(),
    };

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let engine = state.engine.clone();
    let db = state.db.clone();

    tokio::spawn(async move {
        match engine
            .run_turn(&selection, &system_prompt, &history, Toolset::Advanced, &ctx, &tx)
            .await
        {
            Ok(outcome) => {
                if let Some(interaction_id) = &interaction_id {
                    if let Err(e) = db.update_interaction_response(interaction_id, &outcome.text) {
                        warn!(%interaction_id, error = %e, "failed to update interaction");
                    }
                }
                let _ = tx.send(ChatEvent::Done { model: selection.name.clone() }).await;
            }
            Err(e) => {
                error!(error = %e, "advanced chat turn failed");
                let _ = tx
                    .send(ChatEvent::Error { message: "Failed to process request".to_string() })
                    .await;
            }
        }
    });

    sse_response(rx)
}

// ── POST /api/newspapers/generate ─────────────────────────────────────────────

pub async fn newspaper(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<NewspaperRequest>,
) -> Response {
    let history = to_history(&req.messages);
    let selection = state.model_router.select(TaskType::ChatSimple, None);
    let ctx = ToolContext {
        db: state.db.clone(),
        news: state.news.clone(),
        user,
        context: Value::Null,
    };

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let engine = state.engine.clone();

    tokio::spawn(async move {
        match engine
            .run_turn(
                &selection,
                prompts::NEWSPAPER_SYSTEM_PROMPT,
                &history,
                Toolset::Newspaper,
                &ctx,
                &tx,
            )
            .await
        {
            Ok(_) => {
                let _ = tx.send(ChatEvent::Done { model: selection.name.clone() }).await;
            }
            Err(e) => {
                error!(error = %e, "newspaper turn failed");
                let _ = tx
                    .send(ChatEvent::Error { message: "Failed to process request".to_string() })
                    .await;
            }
        }
    });

    sse_response(rx)
}
