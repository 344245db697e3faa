//! Raw TOML deserialization types.
//!
//! These structs mirror the TOML file shape and use `serde` defaults.
//! The `load` module converts them into the public `types` structs.

use serde::Deserialize;

// ── Top-level ────────────────────────────────────────────────────────────────

/// Raw TOML shape — serde target before resolution.
#[derive(Deserialize)]
pub(super) struct RawConfig {
    pub service: RawService,
    #[serde(default)]
    pub server: RawServer,
    #[serde(default)]
    pub database: RawDatabase,
    #[serde(default)]
    pub llm: RawLlm,
    #[serde(default)]
    pub news: RawNews,
    #[serde(default)]
    pub copilot: RawCopilot,
    #[serde(default)]
    pub auth: RawAuth,
}

#[derive(Deserialize)]
pub(super) struct RawService {
    pub name: String,
    pub work_dir: String,
    pub log_level: String,
}

// ── Server ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawServer {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for RawServer {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

// ── Database ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawDatabase {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for RawDatabase {
    fn default() -> Self {
        Self { path: default_db_path() }
    }
}

// ── LLM ──────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawLlm {
    #[serde(rename = "default", default = "default_llm_preference")]
    pub preference: String,
    #[serde(default)]
    pub openai: RawOpenAiConfig,
    #[serde(default)]
    pub groq: RawGroqConfig,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self {
            preference: default_llm_preference(),
            openai: RawOpenAiConfig::default(),
            groq: RawGroqConfig::default(),
        }
    }
}

#[derive(Deserialize)]
pub(super) struct RawOpenAiConfig {
    #[serde(default = "default_openai_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_openai_input_rate")]
    pub input_per_million_usd: f64,
    #[serde(default = "default_openai_output_rate")]
    pub output_per_million_usd: f64,
}

impl Default for RawOpenAiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_openai_api_base_url(),
            model: default_openai_model(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
            input_per_million_usd: default_openai_input_rate(),
            output_per_million_usd: default_openai_output_rate(),
        }
    }
}

#[derive(Deserialize)]
pub(super) struct RawGroqConfig {
    #[serde(default = "default_groq_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_groq_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_groq_input_rate")]
    pub input_per_million_usd: f64,
    #[serde(default = "default_groq_output_rate")]
    pub output_per_million_usd: f64,
}

impl Default for RawGroqConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_groq_api_base_url(),
            model: default_groq_model(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
            input_per_million_usd: default_groq_input_rate(),
            output_per_million_usd: default_groq_output_rate(),
        }
    }
}

// ── News ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawNews {
    #[serde(default = "default_news_base_url")]
    pub base_url: String,
    #[serde(default = "default_news_page_size")]
    pub page_size: usize,
}

impl Default for RawNews {
    fn default() -> Self {
        Self {
            base_url: default_news_base_url(),
            page_size: default_news_page_size(),
        }
    }
}

// ── Copilot ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawCopilot {
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for RawCopilot {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            history_limit: default_history_limit(),
        }
    }
}

// ── Auth ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawAuth {
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
}

impl Default for RawAuth {
    fn default() -> Self {
        Self { session_ttl_hours: default_session_ttl_hours() }
    }
}

// ── Default functions (used by serde) ────────────────────────────────────────

pub(super) fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

pub(super) fn default_db_path() -> String {
    "contentmaster.db".to_string()
}

fn default_llm_preference() -> String {
    "auto".to_string()
}
fn default_openai_api_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}
fn default_openai_model() -> String {
    "gpt-4o".to_string()
}
fn default_groq_api_base_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}
fn default_groq_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_timeout_seconds() -> u64 {
    60
}
fn default_openai_input_rate() -> f64 {
    2.5
}
fn default_openai_output_rate() -> f64 {
    2.5
}
fn default_groq_input_rate() -> f64 {
    0.1
}
fn default_groq_output_rate() -> f64 {
    0.1
}

fn default_news_base_url() -> String {
    "https://newsapi.org/v2".to_string()
}
fn default_news_page_size() -> usize {
    20
}

fn default_max_steps() -> usize {
    10
}
fn default_history_limit() -> usize {
    40
}

fn default_session_ttl_hours() -> i64 {
    24 * 30
}
