//! NewsAPI client.
//!
//! Thin typed wrapper over `GET /everything` and `GET /top-headlines`.
//! Callers decide what to do when no API key is configured — the copilot
//! `news_hunter` tool falls back to synthetic results, the REST endpoints
//! surface a 500.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::NewsConfig;
use crate::error::AppError;

/// One article as returned by NewsAPI, normalized for internal use.
#[derive(Debug, Clone, Serialize)]
pub struct NewsApiArticle {
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub url: String,
    pub source: String,
    pub author: Option<String>,
    pub published_at: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewsClient {
    client: Client,
    base_url: String,
    page_size: usize,
    api_key: Option<String>,
}

impl NewsClient {
    pub fn new(config: &NewsConfig, api_key: Option<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(20))
            .build()
            .map_err(|e| AppError::News(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            page_size: config.page_size,
            api_key,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Full-text search, newest first.
    pub async fn search(
        &self,
        query: &str,
        language: &str,
        limit: usize,
    ) -> Result<Vec<NewsApiArticle>, AppError> {
        let key = self.require_key()?;
        let page_size = limit.min(self.page_size);
        let url = format!("{}/everything", self.base_url);

        debug!(%query, %language, page_size, "searching NewsAPI");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("language", language),
                ("sortBy", "publishedAt"),
                ("pageSize", &page_size.to_string()),
                ("apiKey", key),
            ])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "NewsAPI request failed (transport)");
                AppError::News(e.to_string())
            })?;

        let envelope = decode(response).await?;
        Ok(envelope.articles.into_iter().map(RawArticle::normalize).collect())
    }

    /// Top headlines for a category.
    pub async fn top_headlines(
        &self,
        category: &str,
    ) -> Result<(Vec<NewsApiArticle>, u64), AppError> {
        let key = self.require_key()?;
        let url = format!("{}/top-headlines", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("category", category),
                ("language", "en"),
                ("pageSize", &self.page_size.to_string()),
                ("apiKey", key),
            ])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "NewsAPI request failed (transport)");
                AppError::News(e.to_string())
            })?;

        let envelope = decode(response).await?;
        let total = envelope.total_results.unwrap_or(envelope.articles.len() as u64);
        Ok((
            envelope.articles.into_iter().map(RawArticle::normalize).collect(),
            total,
        ))
    }

    fn require_key(&self) -> Result<&str, AppError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::News("NewsAPI key not configured".into()))
    }
}

async fn decode(response: reqwest::Response) -> Result<Envelope, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(%status, "NewsAPI returned HTTP error");
        return Err(AppError::News(format!("NewsAPI request failed: HTTP {status}: {body}")));
    }
    response
        .json::<Envelope>()
        .await
        .map_err(|e| AppError::News(format!("failed to parse NewsAPI response: {e}")))
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    articles: Vec<RawArticle>,
    #[serde(rename = "totalResults")]
    total_results: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    url: Option<String>,
    source: RawSource,
    #[serde(default)]
    author: Option<String>,
    #[serde(rename = "publishedAt", default)]
    published_at: Option<String>,
    #[serde(rename = "urlToImage", default)]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(default)]
    name: Option<String>,
}

impl RawArticle {
    fn normalize(self) -> NewsApiArticle {
        // `description` falls back to a content prefix, as the dashboard expects.
        let summary = self.description.clone().or_else(|| {
            self.content
                .as_ref()
                .map(|c| c.chars().take(200).collect::<String>())
        });
        NewsApiArticle {
            title: self.title.unwrap_or_else(|| "(untitled)".to_string()),
            summary,
            content: self.content.or(self.description),
            url: self.url.unwrap_or_default(),
            source: self.source.name.unwrap_or_else(|| "unknown".to_string()),
            author: self.author,
            published_at: self.published_at,
            image_url: self.image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(key: Option<&str>) -> NewsClient {
        NewsClient::new(
            &NewsConfig {
                base_url: "https://newsapi.org/v2".to_string(),
                page_size: 20,
            },
            key.map(ToString::to_string),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn missing_key_is_an_error() {
        let c = client(None);
        assert!(!c.has_api_key());
        let err = c.search("rust", "en", 5).await.unwrap_err();
        assert!(err.to_string().contains("key not configured"));
    }

    #[test]
    fn normalize_fills_summary_from_content() {
        let raw = RawArticle {
            title: Some("T".into()),
            description: None,
            content: Some("body text".into()),
            url: Some("https://x".into()),
            source: RawSource { name: Some("Reuters".into()) },
            author: None,
            published_at: None,
            image_url: None,
        };
        let a = raw.normalize();
        assert_eq!(a.summary.as_deref(), Some("body text"));
        assert_eq!(a.source, "Reuters");
    }

    #[test]
    fn envelope_parses_newsapi_shape() {
        let body = r#"{
            "status": "ok",
            "totalResults": 1,
            "articles": [{
                "source": {"id": null, "name": "TechCrunch"},
                "author": "Jo",
                "title": "AI news",
                "description": "desc",
                "url": "https://tc.example/a",
                "urlToImage": null,
                "publishedAt": "2026-08-01T00:00:00Z",
                "content": "full"
            }]
        }"#;
        let env: Envelope = serde_json::from_str(body).unwrap();
        assert_eq!(env.total_results, Some(1));
        assert_eq!(env.articles.len(), 1);
    }
}
