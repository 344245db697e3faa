//! SEO projects, their knowledge base, generated articles, and quality checks.

use rusqlite::{params, OptionalExtension};
use serde::Serialize;

use crate::error::AppError;

use super::{new_id, now, Db};

#[derive(Debug, Clone, Serialize)]
pub struct SeoProject {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub domain: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub target_audience: Option<String>,
    pub brand_tone: Option<String>,
    pub primary_language: String,
    pub project_type: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectKnowledge {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeoArticle {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub meta_title: String,
    pub meta_description: String,
    pub language: String,
    pub keywords: Vec<String>,
    pub target_keyword: String,
    pub word_count: i64,
    pub reading_time: String,
    pub has_table_of_contents: bool,
    pub has_faq: bool,
    pub internal_links_count: i64,
    pub external_links_count: i64,
    pub images_count: i64,
    pub status: String,
    pub created_at: String,
}

/// Insert payload for a generated SEO article.
#[derive(Debug, Clone)]
pub struct NewSeoArticle {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub meta_title: String,
    pub meta_description: String,
    pub language: String,
    pub keywords: Vec<String>,
    pub target_keyword: String,
    pub word_count: i64,
    pub reading_time: String,
    pub has_table_of_contents: bool,
    pub has_faq: bool,
    pub internal_links_count: i64,
    pub external_links_count: i64,
    pub images_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityCheck {
    pub id: String,
    pub article_id: String,
    pub plagiarism_score: f64,
    pub grammar_errors: i64,
    pub readability_score: f64,
    pub seo_score: f64,
    pub eeat_score: f64,
    pub passed: bool,
    pub created_at: String,
}

const PROJECT_COLS: &str = "id, user_id, name, domain, description, industry, target_audience, \
     brand_tone, primary_language, project_type, created_at";

fn row_to_project(row: &rusqlite::Row<'_>) -> rusqlite::Result<SeoProject> {
    Ok(SeoProject {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        domain: row.get("domain")?,
        description: row.get("description")?,
        industry: row.get("industry")?,
        target_audience: row.get("target_audience")?,
        brand_tone: row.get("brand_tone")?,
        primary_language: row.get("primary_language")?,
        project_type: row.get("project_type")?,
        created_at: row.get("created_at")?,
    })
}

const SEO_ARTICLE_COLS: &str = "id, project_id, title, slug, content, meta_title, \
     meta_description, language, keywords, target_keyword, word_count, reading_time, \
     has_table_of_contents, has_faq, internal_links_count, external_links_count, \
     images_count, status, created_at";

fn row_to_seo_article(row: &rusqlite::Row<'_>) -> rusqlite::Result<SeoArticle> {
    let keywords_raw: String = row.get("keywords")?;
    Ok(SeoArticle {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        title: row.get("title")?,
        slug: row.get("slug")?,
        content: row.get("content")?,
        meta_title: row.get("meta_title")?,
        meta_description: row.get("meta_description")?,
        language: row.get("language")?,
        keywords: serde_json::from_str(&keywords_raw).unwrap_or_default(),
        target_keyword: row.get("target_keyword")?,
        word_count: row.get("word_count")?,
        reading_time: row.get("reading_time")?,
        has_table_of_contents: row.get::<_, i64>("has_table_of_contents")? != 0,
        has_faq: row.get::<_, i64>("has_faq")? != 0,
        internal_links_count: row.get("internal_links_count")?,
        external_links_count: row.get("external_links_count")?,
        images_count: row.get("images_count")?,
        status: row.get("status")?,
        created_at: row.get("created_at")?,
    })
}

impl Db {
    // ── Projects ──────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub fn create_seo_project(
        &self,
        user_id: &str,
        name: &str,
        domain: Option<&str>,
        description: Option<&str>,
        industry: Option<&str>,
        target_audience: Option<&str>,
        brand_tone: Option<&str>,
        primary_language: &str,
        project_type: &str,
    ) -> Result<SeoProject, AppError> {
        let id = new_id();
        let ts = now();
        self.conn().execute(
            "INSERT INTO seo_projects (id, user_id, name, domain, description, industry, \
             target_audience, brand_tone, primary_language, project_type, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                id, user_id, name, domain, description, industry, target_audience, brand_tone,
                primary_language, project_type, ts
            ],
        )?;
        Ok(SeoProject {
            id,
            user_id: user_id.to_string(),
            name: name.to_string(),
            domain: domain.map(ToString::to_string),
            description: description.map(ToString::to_string),
            industry: industry.map(ToString::to_string),
            target_audience: target_audience.map(ToString::to_string),
            brand_tone: brand_tone.map(ToString::to_string),
            primary_language: primary_language.to_string(),
            project_type: project_type.to_string(),
            created_at: ts,
        })
    }

    pub fn list_seo_projects(&self, user_id: &str) -> Result<Vec<SeoProject>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLS} FROM seo_projects WHERE user_id = ?1 \
             ORDER BY created_at DESC"
        ))?;
        let rows = stmt
            .query_map(params![user_id], row_to_project)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn seo_project_by_id(&self, id: &str) -> Result<Option<SeoProject>, AppError> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare(&format!("SELECT {PROJECT_COLS} FROM seo_projects WHERE id = ?1"))?;
        Ok(stmt.query_row(params![id], row_to_project).optional()?)
    }

    /// Ownership-checked lookup — `None` when the project exists but belongs
    /// to another user.
    pub fn seo_project_owned(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<SeoProject>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLS} FROM seo_projects WHERE id = ?1 AND user_id = ?2"
        ))?;
        Ok(stmt.query_row(params![id, user_id], row_to_project).optional()?)
    }

    // ── Knowledge base ────────────────────────────────────────────────

    pub fn add_project_knowledge(
        &self,
        project_id: &str,
        title: &str,
        content: &str,
    ) -> Result<String, AppError> {
        let id = new_id();
        self.conn().execute(
            "INSERT INTO project_knowledge (id, project_id, title, content, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, project_id, title, content, now()],
        )?;
        Ok(id)
    }

    pub fn knowledge_for_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<ProjectKnowledge>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, project_id, title, content, created_at FROM project_knowledge \
             WHERE project_id = ?1 ORDER BY created_at ASC",
        )?;
        let rows = stmt
            .query_map(params![project_id], |row| {
                Ok(ProjectKnowledge {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    title: row.get(2)?,
                    content: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Articles ──────────────────────────────────────────────────────

    pub fn insert_seo_article(
        &self,
        project_id: &str,
        article: &NewSeoArticle,
    ) -> Result<SeoArticle, AppError> {
        let id = new_id();
        let ts = now();
        self.conn().execute(
            "INSERT INTO seo_articles (id, project_id, title, slug, content, meta_title, \
             meta_description, language, keywords, target_keyword, word_count, reading_time, \
             has_table_of_contents, has_faq, internal_links_count, external_links_count, \
             images_count, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, \
             ?17, 'review', ?18)",
            params![
                id,
                project_id,
                article.title,
                article.slug,
                article.content,
                article.meta_title,
                article.meta_description,
                article.language,
                serde_json::to_string(&article.keywords)?,
                article.target_keyword,
                article.word_count,
                article.reading_time,
                article.has_table_of_contents as i64,
                article.has_faq as i64,
                article.internal_links_count,
                article.external_links_count,
                article.images_count,
                ts,
            ],
        )?;
        self.seo_article_by_id(&id)?
            .ok_or_else(|| AppError::Db("seo article vanished after insert".into()))
    }

    pub fn seo_article_by_id(&self, id: &str) -> Result<Option<SeoArticle>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SEO_ARTICLE_COLS} FROM seo_articles WHERE id = ?1"
        ))?;
        Ok(stmt.query_row(params![id], row_to_seo_article).optional()?)
    }

    pub fn list_seo_articles(&self, project_id: &str) -> Result<Vec<SeoArticle>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SEO_ARTICLE_COLS} FROM seo_articles WHERE project_id = ?1 \
             ORDER BY created_at DESC"
        ))?;
        let rows = stmt
            .query_map(params![project_id], row_to_seo_article)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Quality checks ────────────────────────────────────────────────

    pub fn quality_checks_for_article(
        &self,
        article_id: &str,
    ) -> Result<Vec<QualityCheck>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, article_id, plagiarism_score, grammar_errors, readability_score, \
             seo_score, eeat_score, passed, created_at \
             FROM article_quality_checks WHERE article_id = ?1 ORDER BY created_at ASC",
        )?;
        let rows = stmt
            .query_map(params![article_id], |row| {
                Ok(QualityCheck {
                    id: row.get(0)?,
                    article_id: row.get(1)?,
                    plagiarism_score: row.get(2)?,
                    grammar_errors: row.get(3)?,
                    readability_score: row.get(4)?,
                    seo_score: row.get(5)?,
                    eeat_score: row.get(6)?,
                    passed: row.get::<_, i64>(7)? != 0,
                    created_at: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn insert_quality_check(
        &self,
        article_id: &str,
        readability_score: f64,
        seo_score: f64,
        eeat_score: f64,
        passed: bool,
    ) -> Result<QualityCheck, AppError> {
        let id = new_id();
        let ts = now();
        self.conn().execute(
            "INSERT INTO article_quality_checks (id, article_id, plagiarism_score, \
             grammar_errors, readability_score, seo_score, eeat_score, passed, created_at) \
             VALUES (?1, ?2, 0, 0, ?3, ?4, ?5, ?6, ?7)",
            params![id, article_id, readability_score, seo_score, eeat_score, passed as i64, ts],
        )?;
        Ok(QualityCheck {
            id,
            article_id: article_id.to_string(),
            plagiarism_score: 0.0,
            grammar_errors: 0,
            readability_score,
            seo_score,
            eeat_score,
            passed,
            created_at: ts,
        })
    }
}
