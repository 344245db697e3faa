//! Provider construction from config.

pub mod dummy;
pub mod openai_compatible;

use crate::config::ProviderConfig;
use crate::llm::{LlmProvider, ProviderError};

use openai_compatible::OpenAiCompatibleProvider;

/// Build a provider for one configured endpoint. `api_key` is `None` for
/// keyless local endpoints.
pub fn build_openai_compatible(
    config: &ProviderConfig,
    api_key: Option<String>,
) -> Result<LlmProvider, ProviderError> {
    Ok(LlmProvider::OpenAiCompatible(OpenAiCompatibleProvider::new(
        config.api_base_url.clone(),
        config.model.clone(),
        config.temperature,
        config.timeout_seconds,
        api_key,
    )?))
}
