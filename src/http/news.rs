//! News discovery endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::db::NewArticle;
use crate::pricing::Operation;
use crate::scoring;

use super::auth::CurrentUser;
use super::{internal_error, json_error, AppState};

// ── POST /api/news/search ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchRequest {
    keywords: Vec<String>,
    #[serde(default)]
    niche: Option<String>,
    #[serde(default = "default_search_limit")]
    limit: usize,
}

fn default_search_limit() -> usize {
    10
}

pub async fn search(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<SearchRequest>,
) -> Response {
    if !state.news.has_api_key() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            json_error("config", "NewsAPI key not configured"),
        )
            .into_response();
    }

    let query = format!(
        "{} {}",
        req.keywords.join(" OR "),
        req.niche.as_deref().unwrap_or("")
    );
    let query = query.trim().to_string();
    let limit = req.limit.min(20);

    info!(%query, "searching news");

    let found = match state.news.search(&query, "en", limit).await {
        Ok(found) => found,
        Err(e) => {
            warn!(error = %e, "news search failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                json_error("news", "Failed to fetch news from NewsAPI"),
            )
                .into_response();
        }
    };

    // Score every hit and persist it into the discovery pipeline.
    let scored: Vec<serde_json::Value> = found
        .iter()
        .map(|a| {
            json!({
                "title": a.title,
                "summary": a.summary,
                "content": a.content,
                "source": a.source,
                "url": a.url,
                "publishedAt": a.published_at,
                "urlToImage": a.image_url,
                "viralScore": scoring::viral_score(),
                "revenueScore": scoring::revenue_score(),
                "trendingPotential": scoring::trending_potential(),
                "estimatedReach": scoring::estimated_reach(),
                "keywords": req.keywords.clone(),
            })
        })
        .collect();

    for article in &scored {
        let insert = NewArticle {
            title: article["title"].as_str().unwrap_or("(untitled)").to_string(),
            original_content: article["content"].as_str().map(ToString::to_string),
            source_url: article["url"].as_str().map(ToString::to_string),
            source_name: article["source"].as_str().map(ToString::to_string),
            published_at: article["publishedAt"].as_str().map(ToString::to_string),
            keywords: req.keywords.clone(),
            niche: req.niche.clone().unwrap_or_else(|| "general".to_string()),
            viral_score: article["viralScore"].as_f64().unwrap_or(0.0),
            revenue_score: article["revenueScore"].as_f64().unwrap_or(0.0),
            trending_potential: article["trendingPotential"].as_f64().unwrap_or(0.0),
            estimated_reach: article["estimatedReach"].as_i64().unwrap_or(0),
            status: "discovered".to_string(),
        };
        if let Err(e) = state.db.insert_article(&user.id, &insert) {
            warn!(error = %e, "failed to persist discovered article");
        }
    }

    if let Err(e) = state
        .db
        .debit_credits(&user.id, Operation::SearchNews.credit_cost())
    {
        warn!(user_id = %user.id, error = %e, "credit debit failed");
    }

    let recommendations: Vec<serde_json::Value> = scored
        .iter()
        .filter(|a| a["viralScore"].as_f64().unwrap_or(0.0) > 75.0)
        .take(3)
        .map(|a| {
            json!({
                "title": a["title"],
                "url": a["url"],
                "viralScore": format!("{:.1}", a["viralScore"].as_f64().unwrap_or(0.0)),
                "revenueScore": format!("{:.1}", a["revenueScore"].as_f64().unwrap_or(0.0)),
                "estimatedReach": format!("{}K", a["estimatedReach"].as_i64().unwrap_or(0) / 1000),
            })
        })
        .collect();

    let average_viral = if scored.is_empty() {
        "0".to_string()
    } else {
        let avg = scored
            .iter()
            .map(|a| a["viralScore"].as_f64().unwrap_or(0.0))
            .sum::<f64>()
            / scored.len() as f64;
        format!("{avg:.1}")
    };

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "totalFound": scored.len(),
            "articles": scored,
            "topRecommendations": recommendations,
            "searchMetadata": {
                "keywords": req.keywords,
                "niche": req.niche,
                "searchedAt": Utc::now().to_rfc3339(),
                "averageViralScore": average_viral,
            }
        })),
    )
        .into_response()
}

// ── GET /api/news/trending ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TrendingQuery {
    #[serde(default = "default_category")]
    category: String,
}

fn default_category() -> String {
    "general".to_string()
}

pub async fn trending(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Query(query): Query<TrendingQuery>,
) -> Response {
    if !state.news.has_api_key() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            json_error("config", "NewsAPI key not configured"),
        )
            .into_response();
    }

    match state.news.top_headlines(&query.category).await {
        Ok((articles, total)) => {
            let mapped: Vec<serde_json::Value> = articles
                .into_iter()
                .map(|a| {
                    json!({
                        "title": a.title,
                        "description": a.summary,
                        "url": a.url,
                        "source": a.source,
                        "publishedAt": a.published_at,
                        "urlToImage": a.image_url,
                        "content": a.content,
                        "category": query.category.clone(),
                    })
                })
                .collect();
            (
                StatusCode::OK,
                Json(json!({
                    "status": "success",
                    "articles": mapped,
                    "totalResults": total,
                })),
            )
                .into_response()
        }
        Err(e) => internal_error(e),
    }
}
