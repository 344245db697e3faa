//! Discovered news articles and their style rewrites.

use rusqlite::{params, OptionalExtension};
use serde::Serialize;

use crate::error::AppError;

use super::{new_id, now, Db};

#[derive(Debug, Clone, Serialize)]
pub struct NewsArticle {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub original_content: Option<String>,
    pub source_url: Option<String>,
    pub source_name: Option<String>,
    pub published_at: Option<String>,
    pub keywords: Vec<String>,
    pub niche: String,
    pub viral_score: f64,
    pub revenue_score: f64,
    pub trending_potential: f64,
    pub estimated_reach: i64,
    pub revenue_total: f64,
    pub revenue_adsense: f64,
    pub revenue_affiliate: f64,
    pub revenue_sponsored: f64,
    pub views: i64,
    pub roi: f64,
    pub generation_cost: f64,
    pub status: String,
    pub created_at: String,
}

/// Insert payload for a discovered article.
#[derive(Debug, Clone, Default)]
pub struct NewArticle {
    pub title: String,
    pub original_content: Option<String>,
    pub source_url: Option<String>,
    pub source_name: Option<String>,
    pub published_at: Option<String>,
    pub keywords: Vec<String>,
    pub niche: String,
    pub viral_score: f64,
    pub revenue_score: f64,
    pub trending_potential: f64,
    pub estimated_reach: i64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleRewrite {
    pub id: String,
    pub article_id: String,
    pub journalist_style_id: String,
    pub rewritten_content: String,
    pub style_applied: String,
    pub tone_adjustment: String,
    pub readability_score: f64,
    pub engagement_potential: String,
    pub word_count: i64,
    pub reading_time_minutes: i64,
    pub improvement_score: i64,
    pub suggestions: Vec<String>,
    pub created_at: String,
}

/// Slim projection used by revenue analytics.
#[derive(Debug, Clone)]
pub struct RevenueRow {
    pub revenue_total: f64,
    pub revenue_adsense: f64,
    pub revenue_affiliate: f64,
    pub revenue_sponsored: f64,
    pub views: i64,
    pub roi: f64,
    pub generation_cost: f64,
    pub status: String,
    pub created_at: String,
}

const ARTICLE_COLS: &str = "id, user_id, title, original_content, source_url, source_name, \
     published_at, keywords, niche, viral_score, revenue_score, trending_potential, \
     estimated_reach, revenue_total, revenue_adsense, revenue_affiliate, revenue_sponsored, \
     views, roi, generation_cost, status, created_at";

fn row_to_article(row: &rusqlite::Row<'_>) -> rusqlite::Result<NewsArticle> {
    let keywords_raw: String = row.get("keywords")?;
    Ok(NewsArticle {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        original_content: row.get("original_content")?,
        source_url: row.get("source_url")?,
        source_name: row.get("source_name")?,
        published_at: row.get("published_at")?,
        keywords: serde_json::from_str(&keywords_raw).unwrap_or_default(),
        niche: row.get("niche")?,
        viral_score: row.get("viral_score")?,
        revenue_score: row.get("revenue_score")?,
        trending_potential: row.get("trending_potential")?,
        estimated_reach: row.get("estimated_reach")?,
        revenue_total: row.get("revenue_total")?,
        revenue_adsense: row.get("revenue_adsense")?,
        revenue_affiliate: row.get("revenue_affiliate")?,
        revenue_sponsored: row.get("revenue_sponsored")?,
        views: row.get("views")?,
        roi: row.get("roi")?,
        generation_cost: row.get("generation_cost")?,
        status: row.get("status")?,
        created_at: row.get("created_at")?,
    })
}

impl Db {
    pub fn insert_article(&self, user_id: &str, article: &NewArticle) -> Result<String, AppError> {
        let id = new_id();
        self.conn().execute(
            "INSERT INTO news_articles (id, user_id, title, original_content, source_url, \
             source_name, published_at, keywords, niche, viral_score, revenue_score, \
             trending_potential, estimated_reach, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                id,
                user_id,
                article.title,
                article.original_content,
                article.source_url,
                article.source_name,
                article.published_at,
                serde_json::to_string(&article.keywords)?,
                article.niche,
                article.viral_score,
                article.revenue_score,
                article.trending_potential,
                article.estimated_reach,
                article.status,
                now(),
            ],
        )?;
        Ok(id)
    }

    pub fn list_articles(
        &self,
        user_id: &str,
        status: Option<&str>,
        limit: usize,
    ) -> Result<Vec<NewsArticle>, AppError> {
        let conn = self.conn();
        let rows = match status {
            Some(status) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ARTICLE_COLS} FROM news_articles \
                     WHERE user_id = ?1 AND status = ?2 \
                     ORDER BY created_at DESC LIMIT ?3"
                ))?;
                stmt.query_map(params![user_id, status, limit as i64], row_to_article)?
                    .collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ARTICLE_COLS} FROM news_articles WHERE user_id = ?1 \
                     ORDER BY created_at DESC LIMIT ?2"
                ))?;
                stmt.query_map(params![user_id, limit as i64], row_to_article)?
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(rows)
    }

    pub fn article_by_id(&self, id: &str) -> Result<Option<NewsArticle>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ARTICLE_COLS} FROM news_articles WHERE id = ?1"
        ))?;
        Ok(stmt.query_row(params![id], row_to_article).optional()?)
    }

    pub fn set_article_status(&self, id: &str, status: &str) -> Result<(), AppError> {
        self.conn().execute(
            "UPDATE news_articles SET status = ?2 WHERE id = ?1",
            params![id, status],
        )?;
        Ok(())
    }

    /// Most recent revenue projections for the user's articles.
    pub fn revenue_rows(&self, user_id: &str, limit: usize) -> Result<Vec<RevenueRow>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT revenue_total, revenue_adsense, revenue_affiliate, revenue_sponsored, \
             views, roi, generation_cost, status, created_at \
             FROM news_articles WHERE user_id = ?1 ORDER BY created_at DESC LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![user_id, limit as i64], |row| {
                Ok(RevenueRow {
                    revenue_total: row.get(0)?,
                    revenue_adsense: row.get(1)?,
                    revenue_affiliate: row.get(2)?,
                    revenue_sponsored: row.get(3)?,
                    views: row.get(4)?,
                    roi: row.get(5)?,
                    generation_cost: row.get(6)?,
                    status: row.get(7)?,
                    created_at: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Rewrites ──────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub fn insert_rewrite(
        &self,
        article_id: &str,
        style_id: &str,
        rewritten_content: &str,
        style_applied: &str,
        tone_adjustment: &str,
        readability_score: f64,
        word_count: i64,
        reading_time_minutes: i64,
        improvement_score: i64,
        suggestions: &[String],
    ) -> Result<ArticleRewrite, AppError> {
        let id = new_id();
        let ts = now();
        self.conn().execute(
            "INSERT INTO article_rewrites (id, article_id, journalist_style_id, \
             rewritten_content, style_applied, tone_adjustment, readability_score, \
             engagement_potential, word_count, reading_time_minutes, improvement_score, \
             suggestions, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'high', ?8, ?9, ?10, ?11, ?12)",
            params![
                id,
                article_id,
                style_id,
                rewritten_content,
                style_applied,
                tone_adjustment,
                readability_score,
                word_count,
                reading_time_minutes,
                improvement_score,
                serde_json::to_string(suggestions)?,
                ts,
            ],
        )?;
        Ok(ArticleRewrite {
            id,
            article_id: article_id.to_string(),
            journalist_style_id: style_id.to_string(),
            rewritten_content: rewritten_content.to_string(),
            style_applied: style_applied.to_string(),
            tone_adjustment: tone_adjustment.to_string(),
            readability_score,
            engagement_potential: "high".to_string(),
            word_count,
            reading_time_minutes,
            improvement_score,
            suggestions: suggestions.to_vec(),
            created_at: ts,
        })
    }
}
