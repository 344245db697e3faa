//! Copilot tools.
//!
//! Each tool is a name + description + JSON-schema parameter block advertised
//! to the model, plus an async executor over serde-validated arguments.
//! Tools are grouped into the three toolsets the chat endpoints expose.
//! A tool either reads/writes the database, calls an external API, or
//! computes a formula — nothing here retries or coordinates.

mod news;
mod newspaper;
mod revenue;
mod rewrite;
mod seo;
mod strategy;

use serde_json::Value;

use crate::db::{Db, User};
use crate::error::AppError;
use crate::llm::ToolDefinition;
use crate::news::NewsClient;

/// Everything a tool executor may need. Cheap to clone per request.
#[derive(Clone)]
pub struct ToolContext {
    pub db: Db,
    pub news: NewsClient,
    pub user: User,
    /// Free-form request context (niche, target audience, article id…).
    pub context: Value,
}

/// The three tool groups the chat endpoints expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toolset {
    /// Standard copilot: news, rewriting, revenue, SEO audit.
    Chat,
    /// Advanced copilot: scored search, projections, variations, strategy.
    Advanced,
    /// Editorial assistant: multi-page newspaper generation.
    Newspaper,
}

impl Toolset {
    /// Tool definitions advertised to the model for this set.
    pub fn definitions(self) -> Vec<ToolDefinition> {
        match self {
            Toolset::Chat => vec![
                news::news_hunter_spec(),
                rewrite::content_rewriter_spec(),
                rewrite::journalist_style_rewriter_spec(),
                revenue::revenue_intelligence_spec(),
                seo::seo_optimizer_spec(),
            ],
            Toolset::Advanced => vec![
                news::search_real_news_spec(),
                rewrite::rewrite_with_journalist_style_spec(),
                revenue::analyze_revenue_spec(),
                seo::optimize_seo_spec(),
                strategy::generate_content_variations_spec(),
                strategy::create_content_strategy_spec(),
            ],
            Toolset::Newspaper => vec![
                newspaper::generate_newspaper_spec(),
                newspaper::configure_editorial_spec(),
                newspaper::validate_quality_spec(),
            ],
        }
    }

    /// Run one tool by name. Unknown names and schema violations surface as
    /// [`AppError::Tool`] — the chat loop feeds those back to the model as
    /// tool errors rather than failing the request.
    pub async fn execute(
        self,
        name: &str,
        args: Value,
        ctx: &ToolContext,
    ) -> Result<Value, AppError> {
        match (self, name) {
            (Toolset::Chat, "news_hunter") => news::news_hunter(parse_args(name, args)?, ctx).await,
            (Toolset::Chat, "content_rewriter") => rewrite::content_rewriter(parse_args(name, args)?),
            (Toolset::Chat, "journalist_style_rewriter") => {
                rewrite::journalist_style_rewriter(parse_args(name, args)?, ctx)
            }
            (Toolset::Chat, "revenue_intelligence") => {
                revenue::revenue_intelligence(parse_args(name, args)?, ctx)
            }
            (Toolset::Chat, "seo_optimizer") => seo::seo_optimizer(parse_args(name, args)?),

            (Toolset::Advanced, "search_real_news") => {
                news::search_real_news(parse_args(name, args)?)
            }
            (Toolset::Advanced, "rewrite_with_journalist_style") => {
                rewrite::rewrite_with_journalist_style(parse_args(name, args)?)
            }
            (Toolset::Advanced, "analyze_revenue") => revenue::analyze_revenue(parse_args(name, args)?),
            (Toolset::Advanced, "optimize_seo") => seo::optimize_seo(parse_args(name, args)?),
            (Toolset::Advanced, "generate_content_variations") => {
                strategy::generate_content_variations(parse_args(name, args)?)
            }
            (Toolset::Advanced, "create_content_strategy") => {
                strategy::create_content_strategy(parse_args(name, args)?)
            }

            (Toolset::Newspaper, "generate_newspaper") => {
                newspaper::generate_newspaper(parse_args(name, args)?)
            }
            (Toolset::Newspaper, "configure_editorial") => {
                newspaper::configure_editorial(parse_args(name, args)?)
            }
            (Toolset::Newspaper, "validate_quality") => {
                newspaper::validate_quality(parse_args(name, args)?)
            }

            _ => Err(AppError::Tool(format!("tool not found: {name}"))),
        }
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(tool: &str, args: Value) -> Result<T, AppError> {
    serde_json::from_value(args)
        .map_err(|e| AppError::Tool(format!("invalid arguments for {tool}: {e}")))
}
