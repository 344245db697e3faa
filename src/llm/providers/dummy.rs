//! Dummy LLM provider — scripted replies for tests and keyless bring-up.
//!
//! Default behavior echoes the last user message prefixed with `[echo]`.
//! Tests can enqueue explicit turns (text and/or tool calls) to drive the
//! copilot loop deterministically.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::llm::{ChatMessage, LlmReply, ProviderError, ToolCallInfo, ToolDefinition};

#[derive(Debug, Clone, Default)]
pub struct DummyProvider {
    script: Arc<Mutex<VecDeque<LlmReply>>>,
    silent: bool,
}

impl DummyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that returns an empty reply — for exercising error paths.
    pub fn silent() -> Self {
        Self { script: Arc::default(), silent: true }
    }

    /// Enqueue a scripted turn; turns are consumed in order before the echo
    /// fallback kicks in.
    pub fn push_turn(&self, reply: LlmReply) {
        self.script.lock().unwrap_or_else(|e| e.into_inner()).push_back(reply);
    }

    /// Convenience: enqueue a plain text turn.
    pub fn push_text(&self, text: &str) {
        self.push_turn(LlmReply { text: Some(text.to_string()), ..Default::default() });
    }

    /// Convenience: enqueue a tool-call turn.
    pub fn push_tool_call(&self, id: &str, name: &str, arguments: serde_json::Value) {
        self.push_turn(LlmReply {
            tool_calls: vec![ToolCallInfo {
                id: id.to_string(),
                name: name.to_string(),
                arguments,
            }],
            ..Default::default()
        });
    }

    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> Result<LlmReply, ProviderError> {
        if let Some(scripted) = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
        {
            return Ok(scripted);
        }
        if self.silent {
            return Ok(LlmReply::default());
        }
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or("");
        Ok(LlmReply {
            text: Some(format!("[echo] {last_user}")),
            ..Default::default()
        })
    }
}
