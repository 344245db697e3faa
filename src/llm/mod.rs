//! LLM provider abstraction.
//!
//! `LlmProvider` is an enum over concrete provider implementations.
//! Add a new variant + module in `providers/` for each additional backend.
//!
//! Provider instances are shared immutable capabilities — clone them freely.
//! Async is delegated to the underlying provider; the `chat` method is
//! `async fn` on the enum so callers need no trait-object machinery.

pub mod providers;
pub mod router;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("provider request failed: {0}")]
    Request(String),
}

// ── Messages & tools ──────────────────────────────────────────────────────────

/// One turn of a chat completion conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into(), tool_calls: None, tool_call_id: None }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into(), tool_calls: None, tool_call_id: None }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".to_string(), content: content.into(), tool_calls: None, tool_call_id: None }
    }

    /// Assistant turn that requested tool calls (content may be empty).
    pub fn assistant_tool_calls(calls: Vec<ToolCallInfo>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: String::new(),
            tool_calls: Some(calls),
            tool_call_id: None,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallInfo {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// Tool definition advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDefinition {
    /// OpenAI function-calling wire shape.
    pub fn to_openai_format(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

// ── Usage & cost accounting ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Token pricing in USD per 1 million tokens.
#[derive(Debug, Clone, Default)]
pub struct ModelRates {
    pub input_per_million_usd: f64,
    pub output_per_million_usd: f64,
}

impl LlmUsage {
    pub fn cost_usd(&self, rates: &ModelRates) -> f64 {
        self.input_tokens as f64 / 1_000_000.0 * rates.input_per_million_usd
            + self.output_tokens as f64 / 1_000_000.0 * rates.output_per_million_usd
    }
}

// ── Reply ─────────────────────────────────────────────────────────────────────

/// One chat completion round trip. The model either answered with text,
/// requested tool calls, or both.
#[derive(Debug, Clone, Default)]
pub struct LlmReply {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCallInfo>,
    pub usage: Option<LlmUsage>,
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available provider backends.
///
/// Enum dispatch avoids `dyn` trait objects and the `async-trait` dependency.
/// Adding a backend = new module + new variant + new `chat` arm.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    Dummy(providers::dummy::DummyProvider),
    OpenAiCompatible(providers::openai_compatible::OpenAiCompatibleProvider),
}

impl LlmProvider {
    /// One chat round trip. `tools` may be empty for plain completions.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<LlmReply, ProviderError> {
        match self {
            LlmProvider::Dummy(p) => p.chat(messages, tools).await,
            LlmProvider::OpenAiCompatible(p) => p.chat(messages, tools).await,
        }
    }

    /// Single-prompt convenience wrapper: optional system + one user message,
    /// no tools, text reply required.
    pub async fn complete(
        &self,
        content: &str,
        system: Option<&str>,
    ) -> Result<String, ProviderError> {
        let mut messages = Vec::new();
        if let Some(sys) = system {
            messages.push(ChatMessage::system(sys));
        }
        messages.push(ChatMessage::user(content));
        let reply = self.chat(&messages, &[]).await?;
        reply
            .text
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ProviderError::Request("empty or missing content in response".into()))
    }
}
