//! Configuration loading with env-var overrides.
//!
//! Reads the TOML file and applies `CONTENTMASTER_WORK_DIR` and
//! `CONTENTMASTER_LOG_LEVEL` overrides. API keys come exclusively from the
//! environment (`LLM_API_KEY`, `GROQ_API_KEY`, `NEWSAPI_KEY`).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

use super::raw::{self, RawConfig};
use super::types::*;

/// Load config from the given path, or `config/default.toml`, then apply
/// env-var overrides. If no path is given and `config/default.toml` does not
/// exist, returns a hardcoded minimal default.
pub fn load(config_path: Option<&str>) -> Result<Config, AppError> {
    let work_dir_override = env::var("CONTENTMASTER_WORK_DIR").ok();
    let log_level_override = env::var("CONTENTMASTER_LOG_LEVEL").ok();

    if let Some(path) = config_path {
        return load_from(
            Path::new(path),
            work_dir_override.as_deref(),
            log_level_override.as_deref(),
        );
    }

    let default_path = Path::new("config/default.toml");
    if default_path.exists() {
        load_from(
            default_path,
            work_dir_override.as_deref(),
            log_level_override.as_deref(),
        )
    } else {
        let work_dir = PathBuf::from(work_dir_override.unwrap_or_else(|| ".".to_string()));
        let log_level = log_level_override.unwrap_or_else(|| "info".to_string());
        Ok(minimal_default(work_dir, log_level))
    }
}

fn load_from(
    path: &Path,
    work_dir_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
    let raw: RawConfig = toml::from_str(&text)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;
    resolve(raw, work_dir_override, log_level_override)
}

fn resolve(
    raw: RawConfig,
    work_dir_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let work_dir = PathBuf::from(
        work_dir_override
            .map(ToString::to_string)
            .unwrap_or(raw.service.work_dir),
    );
    let log_level = log_level_override
        .map(ToString::to_string)
        .unwrap_or(raw.service.log_level);

    let preference = raw.llm.preference;
    match preference.as_str() {
        "auto" | "openai" | "groq" | "dummy" => {}
        other => {
            return Err(AppError::Config(format!(
                "unknown llm preference '{other}' (expected auto, openai, groq, or dummy)"
            )));
        }
    }

    Ok(Config {
        service_name: raw.service.name,
        work_dir,
        log_level,
        server: ServerConfig { bind: raw.server.bind },
        database: DatabaseConfig { path: PathBuf::from(raw.database.path) },
        llm: LlmConfig {
            preference,
            openai: ProviderConfig {
                api_base_url: raw.llm.openai.api_base_url,
                model: raw.llm.openai.model,
                temperature: raw.llm.openai.temperature,
                timeout_seconds: raw.llm.openai.timeout_seconds,
                input_per_million_usd: raw.llm.openai.input_per_million_usd,
                output_per_million_usd: raw.llm.openai.output_per_million_usd,
            },
            groq: ProviderConfig {
                api_base_url: raw.llm.groq.api_base_url,
                model: raw.llm.groq.model,
                temperature: raw.llm.groq.temperature,
                timeout_seconds: raw.llm.groq.timeout_seconds,
                input_per_million_usd: raw.llm.groq.input_per_million_usd,
                output_per_million_usd: raw.llm.groq.output_per_million_usd,
            },
        },
        news: NewsConfig {
            base_url: raw.news.base_url,
            page_size: raw.news.page_size,
        },
        copilot: CopilotConfig {
            max_steps: raw.copilot.max_steps,
            history_limit: raw.copilot.history_limit,
        },
        auth: AuthConfig { session_ttl_hours: raw.auth.session_ttl_hours },
        llm_api_key: env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty()),
        groq_api_key: env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty()),
        newsapi_key: env::var("NEWSAPI_KEY").ok().filter(|k| !k.is_empty()),
    })
}

fn minimal_default(work_dir: PathBuf, log_level: String) -> Config {
    Config {
        service_name: "contentmaster".to_string(),
        work_dir,
        log_level,
        server: ServerConfig { bind: raw::default_bind() },
        database: DatabaseConfig { path: PathBuf::from(raw::default_db_path()) },
        llm: LlmConfig {
            preference: "auto".to_string(),
            openai: ProviderConfig {
                api_base_url: "https://api.openai.com/v1/chat/completions".to_string(),
                model: "gpt-4o".to_string(),
                temperature: 0.7,
                timeout_seconds: 60,
                input_per_million_usd: 2.5,
                output_per_million_usd: 2.5,
            },
            groq: ProviderConfig {
                api_base_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
                model: "llama-3.3-70b-versatile".to_string(),
                temperature: 0.7,
                timeout_seconds: 60,
                input_per_million_usd: 0.1,
                output_per_million_usd: 0.1,
            },
        },
        news: NewsConfig {
            base_url: "https://newsapi.org/v2".to_string(),
            page_size: 20,
        },
        copilot: CopilotConfig { max_steps: 10, history_limit: 40 },
        auth: AuthConfig { session_ttl_hours: 24 * 30 },
        llm_api_key: env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty()),
        groq_api_key: env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty()),
        newsapi_key: env::var("NEWSAPI_KEY").ok().filter(|k| !k.is_empty()),
    }
}
