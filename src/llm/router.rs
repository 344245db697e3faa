//! Task-based model routing.
//!
//! A static mapping from task type to provider: style imitation, SEO
//! generation, and published rewrites go to the premium provider when its
//! key is configured; everything else falls back to the fast provider.
//! An explicit preference (config-wide or per request) short-circuits the
//! table. With no keys at all the dummy provider keeps the service usable.

use crate::config::LlmConfig;
use crate::llm::providers::{build_openai_compatible, dummy::DummyProvider};
use crate::llm::{LlmProvider, ModelRates, ProviderError};

/// What the caller is asking the model to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    /// High quality rewriting with a journalist style.
    JournalistStyle,
    /// SEO-optimized article generation.
    SeoArticle,
    /// Rewriting news articles for publication.
    NewsRewrite,
    /// Simple chat responses.
    ChatSimple,
    /// Revenue/SEO analysis.
    Analysis,
    /// News search and discovery.
    Search,
}

impl TaskType {
    /// Tasks where output quality justifies the premium provider.
    fn prefers_premium(self) -> bool {
        matches!(
            self,
            TaskType::JournalistStyle | TaskType::SeoArticle | TaskType::NewsRewrite
        )
    }
}

/// A routed provider choice.
#[derive(Debug, Clone)]
pub struct Selection {
    pub provider: LlmProvider,
    /// Human-readable model label, surfaced in responses and logs.
    pub name: String,
    pub rates: ModelRates,
}

pub struct ModelRouter {
    preference: String,
    openai: Option<Selection>,
    groq: Option<Selection>,
    dummy: Selection,
}

impl ModelRouter {
    /// Build the router from config. Providers are only instantiated for
    /// endpoints whose API key is present.
    pub fn new(
        config: &LlmConfig,
        openai_key: Option<String>,
        groq_key: Option<String>,
    ) -> Result<Self, ProviderError> {
        let openai = match openai_key {
            Some(key) => Some(Selection {
                provider: build_openai_compatible(&config.openai, Some(key))?,
                name: config.openai.model.clone(),
                rates: ModelRates {
                    input_per_million_usd: config.openai.input_per_million_usd,
                    output_per_million_usd: config.openai.output_per_million_usd,
                },
            }),
            None => None,
        };
        let groq = match groq_key {
            Some(key) => Some(Selection {
                provider: build_openai_compatible(&config.groq, Some(key))?,
                name: config.groq.model.clone(),
                rates: ModelRates {
                    input_per_million_usd: config.groq.input_per_million_usd,
                    output_per_million_usd: config.groq.output_per_million_usd,
                },
            }),
            None => None,
        };
        let dummy = Selection {
            provider: LlmProvider::Dummy(DummyProvider::new()),
            name: "dummy".to_string(),
            rates: ModelRates::default(),
        };
        Ok(Self { preference: config.preference.clone(), openai, groq, dummy })
    }

    /// Router backed only by a scripted dummy provider — for tests.
    pub fn dummy(provider: DummyProvider) -> Self {
        Self {
            preference: "dummy".to_string(),
            openai: None,
            groq: None,
            dummy: Selection {
                provider: LlmProvider::Dummy(provider),
                name: "dummy".to_string(),
                rates: ModelRates::default(),
            },
        }
    }

    /// Pick a provider for `task`. `user_preference` (from the request)
    /// overrides the config-wide preference.
    pub fn select(&self, task: TaskType, user_preference: Option<&str>) -> Selection {
        let pref = user_preference.unwrap_or(self.preference.as_str());

        match pref {
            "openai" => {
                // Explicit preference is honored only when the key exists.
                if let Some(sel) = &self.openai {
                    return sel.clone();
                }
            }
            "groq" => {
                if let Some(sel) = &self.groq {
                    return sel.clone();
                }
            }
            "dummy" => return self.dummy.clone(),
            _ => {}
        }

        if task.prefers_premium() {
            if let Some(sel) = &self.openai {
                return sel.clone();
            }
        }
        if let Some(sel) = &self.groq {
            return sel.clone();
        }
        if let Some(sel) = &self.openai {
            return sel.clone();
        }
        self.dummy.clone()
    }

    /// Rough cost estimate for `tokens` total tokens on the named model.
    pub fn estimate_cost(&self, model: &str, tokens: u64) -> f64 {
        let per_million = if model.contains("gpt-4") {
            self.openai
                .as_ref()
                .map(|s| s.rates.input_per_million_usd)
                .unwrap_or(2.5)
        } else {
            self.groq
                .as_ref()
                .map(|s| s.rates.input_per_million_usd)
                .unwrap_or(0.1)
        };
        tokens as f64 / 1_000_000.0 * per_million
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    fn llm_config(preference: &str) -> LlmConfig {
        let endpoint = |model: &str, rate: f64| ProviderConfig {
            api_base_url: "http://127.0.0.1:1/v1/chat/completions".to_string(),
            model: model.to_string(),
            temperature: 0.7,
            timeout_seconds: 5,
            input_per_million_usd: rate,
            output_per_million_usd: rate,
        };
        LlmConfig {
            preference: preference.to_string(),
            openai: endpoint("gpt-4o", 2.5),
            groq: endpoint("llama-3.3-70b-versatile", 0.1),
        }
    }

    #[test]
    fn premium_tasks_route_to_openai_when_keyed() {
        let router = ModelRouter::new(
            &llm_config("auto"),
            Some("sk-x".to_string()),
            Some("gq-x".to_string()),
        )
        .unwrap();

        for task in [TaskType::JournalistStyle, TaskType::SeoArticle, TaskType::NewsRewrite] {
            assert_eq!(router.select(task, None).name, "gpt-4o", "{task:?}");
        }
        for task in [TaskType::ChatSimple, TaskType::Analysis, TaskType::Search] {
            assert_eq!(router.select(task, None).name, "llama-3.3-70b-versatile", "{task:?}");
        }
    }

    #[test]
    fn missing_premium_key_falls_back_to_groq() {
        let router =
            ModelRouter::new(&llm_config("auto"), None, Some("gq-x".to_string())).unwrap();
        assert_eq!(
            router.select(TaskType::JournalistStyle, None).name,
            "llama-3.3-70b-versatile"
        );
    }

    #[test]
    fn user_preference_overrides_task_table() {
        let router = ModelRouter::new(
            &llm_config("auto"),
            Some("sk-x".to_string()),
            Some("gq-x".to_string()),
        )
        .unwrap();
        assert_eq!(
            router.select(TaskType::ChatSimple, Some("openai")).name,
            "gpt-4o"
        );
        assert_eq!(
            router.select(TaskType::SeoArticle, Some("groq")).name,
            "llama-3.3-70b-versatile"
        );
    }

    #[test]
    fn preference_without_key_falls_through() {
        let router =
            ModelRouter::new(&llm_config("openai"), None, Some("gq-x".to_string())).unwrap();
        // openai preferred but unkeyed — table fallback applies
        assert_eq!(
            router.select(TaskType::ChatSimple, None).name,
            "llama-3.3-70b-versatile"
        );
    }

    #[test]
    fn no_keys_at_all_yields_dummy() {
        let router = ModelRouter::new(&llm_config("auto"), None, None).unwrap();
        assert_eq!(router.select(TaskType::Search, None).name, "dummy");
    }

    #[test]
    fn cost_estimate_splits_on_model_family() {
        let router = ModelRouter::new(
            &llm_config("auto"),
            Some("sk-x".to_string()),
            Some("gq-x".to_string()),
        )
        .unwrap();
        assert!((router.estimate_cost("gpt-4o", 1_000_000) - 2.5).abs() < 1e-9);
        assert!((router.estimate_cost("llama-3.3-70b", 1_000_000) - 0.1).abs() < 1e-9);
    }
}
