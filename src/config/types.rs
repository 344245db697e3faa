//! Public configuration types.
//!
//! These are the resolved, ready-to-use structs that the rest of the service
//! consumes. Raw TOML deserialization types live in `raw.rs`.

use std::path::PathBuf;

// ── Server ───────────────────────────────────────────────────────────────────

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind the axum listener to.
    pub bind: String,
}

// ── Database ─────────────────────────────────────────────────────────────────

/// SQLite database configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database file path (absolute, or relative to `work_dir`).
    pub path: PathBuf,
}

// ── LLM ──────────────────────────────────────────────────────────────────────

/// Per-provider endpoint configuration.
/// Populated from `[llm.openai]` / `[llm.groq]` in the TOML.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Token pricing rates (USD per 1 million tokens).
    pub input_per_million_usd: f64,
    pub output_per_million_usd: f64,
}

/// LLM subsystem configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Routing preference: `"auto"`, `"openai"`, `"groq"`, or `"dummy"`.
    pub preference: String,
    /// Config for the premium provider (`[llm.openai]`).
    pub openai: ProviderConfig,
    /// Config for the fast/cheap provider (`[llm.groq]`).
    pub groq: ProviderConfig,
}

// ── News ─────────────────────────────────────────────────────────────────────

/// NewsAPI client configuration.
#[derive(Debug, Clone)]
pub struct NewsConfig {
    /// API root, e.g. `https://newsapi.org/v2`.
    pub base_url: String,
    /// Default page size for searches.
    pub page_size: usize,
}

// ── Copilot ──────────────────────────────────────────────────────────────────

/// Copilot chat engine configuration.
#[derive(Debug, Clone)]
pub struct CopilotConfig {
    /// Maximum tool-call round trips per chat turn.
    pub max_steps: usize,
    /// How many prior messages are replayed into the prompt.
    pub history_limit: usize,
}

// ── Auth ─────────────────────────────────────────────────────────────────────

/// Session authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session lifetime in hours.
    pub session_ttl_hours: i64,
}

// ── Config (root) ────────────────────────────────────────────────────────────

/// Fully-resolved service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub service_name: String,
    /// Working directory for persistent data (already expanded).
    pub work_dir: PathBuf,
    pub log_level: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub news: NewsConfig,
    pub copilot: CopilotConfig,
    pub auth: AuthConfig,
    /// API key for the premium provider, from `LLM_API_KEY` env — never TOML.
    pub llm_api_key: Option<String>,
    /// API key for the fast provider, from `GROQ_API_KEY` env — never TOML.
    pub groq_api_key: Option<String>,
    /// NewsAPI key, from `NEWSAPI_KEY` env — never TOML.
    pub newsapi_key: Option<String>,
}

impl Config {
    /// Resolve the database path against `work_dir` when it is relative.
    pub fn database_path(&self) -> PathBuf {
        if self.database.path.is_absolute() {
            self.database.path.clone()
        } else {
            self.work_dir.join(&self.database.path)
        }
    }
}
