//! Copilot chat engine.
//!
//! One turn = a bounded loop of provider round trips. Tool calls returned by
//! the model are executed through the toolset and their results appended as
//! `tool` messages; the loop ends on the first plain assistant reply or when
//! `max_steps` is exhausted. Events are emitted as the loop runs so the HTTP
//! layer can stream them to the client; the final text is additionally
//! chunked into `Delta` events.

pub mod prompts;

use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::llm::router::Selection;
use crate::llm::{ChatMessage, LlmUsage};
use crate::tools::{ToolContext, Toolset};

/// Stream events emitted while a turn runs.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    ToolCall { id: String, name: String, arguments: Value },
    ToolResult { id: String, name: String, ok: bool, data: Value },
    Delta { text: String },
    Done { model: String },
    Error { message: String },
}

/// What a completed turn produced.
#[derive(Debug, Clone, Default)]
pub struct TurnOutcome {
    pub text: String,
    /// Tool-call audit trail, stored as assistant-message metadata.
    pub tool_calls: Vec<Value>,
    pub usage: LlmUsage,
}

/// Size of each streamed text chunk, in characters.
const DELTA_CHUNK_CHARS: usize = 120;

pub struct ChatEngine {
    max_steps: usize,
}

impl ChatEngine {
    pub fn new(max_steps: usize) -> Self {
        Self { max_steps }
    }

    /// Run one chat turn. `history` already contains the new user message.
    /// Events are best-effort: a dropped receiver (client gone) never fails
    /// the turn.
    pub async fn run_turn(
        &self,
        selection: &Selection,
        system_prompt: &str,
        history: &[ChatMessage],
        toolset: Toolset,
        ctx: &ToolContext,
        events: &mpsc::Sender<ChatEvent>,
    ) -> Result<TurnOutcome, AppError> {
        let tools = toolset.definitions();
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend_from_slice(history);

        let mut outcome = TurnOutcome::default();

        for step in 0..self.max_steps {
            let reply = selection
                .provider
                .chat(&messages, &tools)
                .await
                .map_err(|e| AppError::Llm(e.to_string()))?;

            if let Some(usage) = &reply.usage {
                outcome.usage.input_tokens += usage.input_tokens;
                outcome.usage.output_tokens += usage.output_tokens;
            }

            if reply.tool_calls.is_empty() {
                outcome.text = reply.text.unwrap_or_default();
                break;
            }

            debug!(step, calls = reply.tool_calls.len(), "executing tool calls");
            messages.push(ChatMessage::assistant_tool_calls(reply.tool_calls.clone()));

            for call in reply.tool_calls {
                let _ = events
                    .send(ChatEvent::ToolCall {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    })
                    .await;

                let (ok, data) = match toolset.execute(&call.name, call.arguments.clone(), ctx).await
                {
                    Ok(data) => (true, data),
                    Err(e) => {
                        warn!(tool = %call.name, error = %e, "tool execution failed");
                        (false, json!({ "error": e.to_string() }))
                    }
                };

                outcome.tool_calls.push(json!({
                    "id": call.id.clone(),
                    "name": call.name.clone(),
                    "arguments": call.arguments,
                    "ok": ok,
                }));

                let _ = events
                    .send(ChatEvent::ToolResult {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        ok,
                        data: data.clone(),
                    })
                    .await;

                messages.push(ChatMessage::tool_result(call.id, data.to_string()));
            }
        }

        if outcome.text.is_empty() {
            // Step budget exhausted on tool calls, or the model went quiet.
            // Ask once more without tools for a closing summary.
            let reply = selection
                .provider
                .chat(&messages, &[])
                .await
                .map_err(|e| AppError::Llm(e.to_string()))?;
            if let Some(usage) = &reply.usage {
                outcome.usage.input_tokens += usage.input_tokens;
                outcome.usage.output_tokens += usage.output_tokens;
            }
            outcome.text = reply.text.unwrap_or_default();
        }

        if outcome.usage.input_tokens + outcome.usage.output_tokens > 0 {
            debug!(
                input_tokens = outcome.usage.input_tokens,
                output_tokens = outcome.usage.output_tokens,
                cost_usd = outcome.usage.cost_usd(&selection.rates),
                "llm usage"
            );
        }

        for chunk in chunk_text(&outcome.text, DELTA_CHUNK_CHARS) {
            let _ = events.send(ChatEvent::Delta { text: chunk }).await;
        }
        // `Done` is the caller's to send — persistence happens first.

        Ok(outcome)
    }
}

/// Split on char boundaries into chunks of at most `size` characters.
fn chunk_text(text: &str, size: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size.max(1))
        .map(|c| c.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NewsConfig;
    use crate::db::Db;
    use crate::llm::providers::dummy::DummyProvider;
    use crate::llm::router::ModelRouter;
    use crate::llm::router::TaskType;
    use crate::news::NewsClient;

    fn ctx(db: &Db) -> ToolContext {
        let user = db.create_user("a@b.c", "d", "Ada").unwrap();
        let news = NewsClient::new(
            &NewsConfig { base_url: "https://newsapi.org/v2".into(), page_size: 20 },
            None,
        )
        .unwrap();
        ToolContext { db: db.clone(), news, user, context: Value::Null }
    }

    fn drain(rx: &mut mpsc::Receiver<ChatEvent>) -> Vec<ChatEvent> {
        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }
        events
    }

    #[tokio::test]
    async fn plain_reply_turn_streams_deltas() {
        let dummy = DummyProvider::new();
        dummy.push_text("final answer");
        let router = ModelRouter::dummy(dummy);
        let selection = router.select(TaskType::ChatSimple, None);

        let db = Db::open_in_memory().unwrap();
        let (tx, mut rx) = mpsc::channel(64);
        let outcome = ChatEngine::new(5)
            .run_turn(
                &selection,
                "system",
                &[ChatMessage::user("hi")],
                Toolset::Chat,
                &ctx(&db),
                &tx,
            )
            .await
            .unwrap();

        assert_eq!(outcome.text, "final answer");
        assert!(outcome.tool_calls.is_empty());
        let events = drain(&mut rx);
        assert!(matches!(events.first(), Some(ChatEvent::Delta { .. })));
        let streamed: String = events
            .iter()
            .filter_map(|e| match e {
                ChatEvent::Delta { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(streamed, "final answer");
    }

    #[tokio::test]
    async fn tool_call_turn_executes_and_records() {
        let dummy = DummyProvider::new();
        dummy.push_tool_call(
            "call_1",
            "seo_optimizer",
            json!({"content": "short text"}),
        );
        dummy.push_text("here is your audit");
        let router = ModelRouter::dummy(dummy);
        let selection = router.select(TaskType::ChatSimple, None);

        let db = Db::open_in_memory().unwrap();
        let (tx, mut rx) = mpsc::channel(64);
        let outcome = ChatEngine::new(5)
            .run_turn(
                &selection,
                "system",
                &[ChatMessage::user("audit this")],
                Toolset::Chat,
                &ctx(&db),
                &tx,
            )
            .await
            .unwrap();

        assert_eq!(outcome.text, "here is your audit");
        assert_eq!(outcome.tool_calls.len(), 1);
        assert_eq!(outcome.tool_calls[0]["name"], "seo_optimizer");
        assert_eq!(outcome.tool_calls[0]["ok"], true);

        let events = drain(&mut rx);
        assert!(matches!(events[0], ChatEvent::ToolCall { .. }));
        match &events[1] {
            ChatEvent::ToolResult { ok, data, .. } => {
                assert!(ok);
                assert!(data["score"].is_number());
            }
            other => panic!("expected ToolResult, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failing_tool_is_reported_not_fatal() {
        let dummy = DummyProvider::new();
        dummy.push_tool_call("call_1", "no_such_tool", json!({}));
        dummy.push_text("recovered");
        let router = ModelRouter::dummy(dummy);
        let selection = router.select(TaskType::ChatSimple, None);

        let db = Db::open_in_memory().unwrap();
        let (tx, mut rx) = mpsc::channel(64);
        let outcome = ChatEngine::new(5)
            .run_turn(
                &selection,
                "system",
                &[ChatMessage::user("x")],
                Toolset::Chat,
                &ctx(&db),
                &tx,
            )
            .await
            .unwrap();

        assert_eq!(outcome.text, "recovered");
        assert_eq!(outcome.tool_calls[0]["ok"], false);
        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, ChatEvent::ToolResult { ok: false, .. })));
    }

    #[tokio::test]
    async fn step_budget_forces_a_closing_reply() {
        let dummy = DummyProvider::new();
        // exactly the budget's worth of tool turns; the closing reply then
        // falls through to the echo behavior
        for i in 0..2 {
            dummy.push_tool_call(
                &format!("call_{i}"),
                "seo_optimizer",
                json!({"content": "text"}),
            );
        }
        let router = ModelRouter::dummy(dummy);
        let selection = router.select(TaskType::ChatSimple, None);

        let db = Db::open_in_memory().unwrap();
        let (tx, _rx) = mpsc::channel(64);
        let outcome = ChatEngine::new(2)
            .run_turn(
                &selection,
                "system",
                &[ChatMessage::user("loop")],
                Toolset::Chat,
                &ctx(&db),
                &tx,
            )
            .await
            .unwrap();

        // only max_steps tool rounds ran, then the echo fallback closed out
        assert_eq!(outcome.tool_calls.len(), 2);
        assert!(!outcome.text.is_empty());
    }

    #[test]
    fn chunking_respects_char_boundaries() {
        let text = "abc".repeat(100);
        let chunks = chunk_text(&text, 120);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 120);
        assert_eq!(chunks.concat(), text);
        assert!(chunk_text("", 120).is_empty());
    }
}
