//! SEO project CRUD and article generation.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::db::NewSeoArticle;
use crate::llm::router::TaskType;
use crate::pricing::Operation;
use crate::scoring;

use super::auth::CurrentUser;
use super::{internal_error, json_error, not_found, AppState};

const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

// ── Projects ──────────────────────────────────────────────────────────────────

/// GET /api/seo/projects
pub async fn list_projects(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Response {
    match state.db.list_seo_projects(&user.id) {
        Ok(projects) => (StatusCode::OK, Json(json!({ "projects": projects }))).into_response(),
        Err(e) => internal_error(e),
    }
}

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    name: String,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    target_audience: Option<String>,
    #[serde(default)]
    brand_tone: Option<String>,
    #[serde(default)]
    primary_language: Option<String>,
    #[serde(default)]
    project_type: Option<String>,
}

/// POST /api/seo/projects
pub async fn create_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateProjectRequest>,
) -> Response {
    match state.db.create_seo_project(
        &user.id,
        &req.name,
        req.domain.as_deref(),
        req.description.as_deref(),
        req.industry.as_deref(),
        req.target_audience.as_deref(),
        req.brand_tone.as_deref(),
        req.primary_language.as_deref().unwrap_or("en"),
        req.project_type.as_deref().unwrap_or("blog"),
    ) {
        Ok(project) => (StatusCode::OK, Json(json!({ "project": project }))).into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /api/seo/projects/{id}/articles
pub async fn project_articles(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(project_id): Path<String>,
) -> Response {
    match state.db.seo_project_owned(&project_id, &user.id) {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Project not found"),
        Err(e) => return internal_error(e),
    }

    match state.db.list_seo_articles(&project_id) {
        Ok(articles) => (StatusCode::OK, Json(json!({ "articles": articles }))).into_response(),
        Err(e) => internal_error(e),
    }
}

// ── POST /api/seo/articles/generate ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct GenerateRequest {
    project_id: String,
    target_keyword: String,
    #[serde(default = "default_language")]
    language: String,
    #[serde(default)]
    include_images: bool,
    #[serde(default)]
    include_faq: bool,
    #[serde(default)]
    include_toc: bool,
    #[serde(default)]
    word_count: Option<usize>,
    #[serde(default)]
    tone: Option<String>,
    #[serde(default)]
    provider: Option<String>,
}

fn default_language() -> String {
    "en".to_string()
}

pub async fn generate_article(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<GenerateRequest>,
) -> Response {
    let project = match state.db.seo_project_owned(&req.project_id, &user.id) {
        Ok(Some(project)) => project,
        Ok(None) => return not_found("Project not found"),
        Err(e) => return internal_error(e),
    };

    let knowledge = match state.db.knowledge_for_project(&project.id) {
        Ok(rows) => rows,
        Err(e) => return internal_error(e),
    };
    let knowledge_context = knowledge
        .iter()
        .map(|kb| format!("{}: {}", kb.title, kb.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    let tone = req
        .tone
        .as_deref()
        .or(project.brand_tone.as_deref())
        .unwrap_or("professional");

    let prompt = format!(
        "You are an expert SEO content writer. Generate a complete, SEO-optimized article in \
         {language} language.\n\n\
         TARGET KEYWORD: {keyword}\n\
         TONE: {tone}\n\
         WORD COUNT: {words} words\n\
         INDUSTRY: {industry}\n\
         TARGET AUDIENCE: {audience}\n\n\
         BRAND KNOWLEDGE:\n{knowledge}\n\n\
         REQUIREMENTS:\n\
         - Write naturally, sound human (not AI-detectable)\n\
         - Follow E-E-A-T principles (Expertise, Experience, Authoritativeness, Trustworthiness)\n\
         - Include {toc}\n\
         - {faq}\n\
         - Use the target keyword naturally 5-8 times\n\
         - Include LSI keywords and semantic variations\n\
         - Structure with H2 and H3 headings\n\
         - Add internal linking opportunities (mark with [INTERNAL_LINK: topic])\n\
         - Add external linking opportunities to authoritative sources (mark with [EXTERNAL_LINK: source])\n\
         {images}\
         - Ensure 100% unique content\n\
         - Make it scannable with bullet points and short paragraphs\n\n\
         Generate the complete article now:",
        language = req.language,
        keyword = req.target_keyword,
        words = req.word_count.unwrap_or(1500),
        industry = project.industry.as_deref().unwrap_or(""),
        audience = project.target_audience.as_deref().unwrap_or(""),
        knowledge = knowledge_context,
        toc = if req.include_toc { "a Table of Contents" } else { "clear headings" },
        faq = if req.include_faq {
            "Include a FAQ section at the end"
        } else {
            "End with a strong conclusion"
        },
        images = if req.include_images {
            "- Suggest 3-5 image placements with descriptions (mark with [IMAGE: description])\n"
        } else {
            ""
        },
    );

    let selection = state
        .model_router
        .select(TaskType::SeoArticle, req.provider.as_deref());

    let text = match tokio::time::timeout(
        GENERATION_TIMEOUT,
        selection.provider.complete(&prompt, None),
    )
    .await
    {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(project_id = %project.id, error = %e, "seo generation failed");
            return internal_error(crate::error::AppError::Llm(e.to_string()));
        }
        Err(_) => {
            return (
                StatusCode::GATEWAY_TIMEOUT,
                json_error("timeout", "LLM request timed out"),
            )
                .into_response();
        }
    };

    // Derive metadata from the generated markdown.
    let words = scoring::word_count(&text);
    let reading_time = format!("{} min read", scoring::reading_time_minutes(words));
    let title = text
        .lines()
        .find_map(|l| l.strip_prefix("# "))
        .unwrap_or(&req.target_keyword)
        .trim()
        .to_string();
    let slug = slugify(&title);
    let meta_description = meta_description(&text);
    let internal_links = text.matches("[INTERNAL_LINK:").count() as i64;
    let external_links = text.matches("[EXTERNAL_LINK:").count() as i64;
    let images = text.matches("[IMAGE:").count() as i64;

    let article = match state.db.insert_seo_article(
        &project.id,
        &NewSeoArticle {
            title: title.clone(),
            slug,
            content: text.clone(),
            meta_title: title,
            meta_description,
            language: req.language,
            keywords: vec![req.target_keyword.clone()],
            target_keyword: req.target_keyword,
            word_count: words as i64,
            reading_time,
            has_table_of_contents: req.include_toc,
            has_faq: req.include_faq,
            internal_links_count: internal_links,
            external_links_count: external_links,
            images_count: images,
        },
    ) {
        Ok(article) => article,
        Err(e) => return internal_error(e),
    };

    // Quality gate runs on every generated article.
    let readability = scoring::readability_score(&text);
    let seo = scoring::seo_score(&text);
    if let Err(e) = state.db.insert_quality_check(
        &article.id,
        readability,
        seo,
        85.0,
        scoring::quality_passed(readability, seo),
    ) {
        warn!(article_id = %article.id, error = %e, "quality check insert failed");
    }

    if let Err(e) = state
        .db
        .debit_credits(&user.id, Operation::GenerateArticle.credit_cost())
    {
        warn!(user_id = %user.id, error = %e, "credit debit failed");
    }

    (StatusCode::OK, Json(json!({ "article": article }))).into_response()
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_matches('-').to_string()
}

/// First body paragraph, clipped to 155 characters.
fn meta_description(text: &str) -> String {
    let first_paragraph = text
        .split("\n\n")
        .nth(1)
        .unwrap_or_else(|| text.get(..text.len().min(300)).unwrap_or(text));
    let clipped: String = first_paragraph.chars().take(155).collect();
    format!("{clipped}...")
}
