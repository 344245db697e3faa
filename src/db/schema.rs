//! Schema bootstrap.
//!
//! Tables are created on open with `IF NOT EXISTS` — the service owns its
//! database file and there is no out-of-band migration tooling.

use rusqlite::Connection;

use crate::error::AppError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id                      TEXT PRIMARY KEY,
    email                   TEXT NOT NULL UNIQUE,
    password_digest         TEXT NOT NULL,
    full_name               TEXT NOT NULL,
    plan                    TEXT NOT NULL DEFAULT 'starter',
    credits_balance         REAL NOT NULL DEFAULT 100,
    credits_used_today      REAL NOT NULL DEFAULT 0,
    total_revenue_generated REAL NOT NULL DEFAULT 0,
    copilot_preferences     TEXT NOT NULL DEFAULT '{}',
    created_at              TEXT NOT NULL,
    updated_at              TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS auth_sessions (
    token_digest TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES users(id),
    created_at   TEXT NOT NULL,
    expires_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS news_articles (
    id                 TEXT PRIMARY KEY,
    user_id            TEXT NOT NULL REFERENCES users(id),
    title              TEXT NOT NULL,
    original_content   TEXT,
    source_url         TEXT,
    source_name        TEXT,
    published_at       TEXT,
    keywords           TEXT NOT NULL DEFAULT '[]',
    niche              TEXT NOT NULL DEFAULT 'general',
    viral_score        REAL NOT NULL DEFAULT 0,
    revenue_score      REAL NOT NULL DEFAULT 0,
    trending_potential REAL NOT NULL DEFAULT 0,
    estimated_reach    INTEGER NOT NULL DEFAULT 0,
    revenue_total      REAL NOT NULL DEFAULT 0,
    revenue_adsense    REAL NOT NULL DEFAULT 0,
    revenue_affiliate  REAL NOT NULL DEFAULT 0,
    revenue_sponsored  REAL NOT NULL DEFAULT 0,
    views              INTEGER NOT NULL DEFAULT 0,
    roi                REAL NOT NULL DEFAULT 0,
    generation_cost    REAL NOT NULL DEFAULT 0,
    status             TEXT NOT NULL DEFAULT 'discovered',
    created_at         TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_news_articles_user ON news_articles(user_id, created_at);

CREATE TABLE IF NOT EXISTS journalist_styles (
    id                    TEXT PRIMARY KEY,
    user_id               TEXT NOT NULL REFERENCES users(id),
    name                  TEXT NOT NULL,
    description           TEXT,
    tone                  TEXT,
    style_characteristics TEXT NOT NULL DEFAULT '{}',
    training_text_1       TEXT,
    training_text_2       TEXT,
    training_text_3       TEXT,
    is_default            INTEGER NOT NULL DEFAULT 0,
    usage_count           INTEGER NOT NULL DEFAULT 0,
    created_at            TEXT NOT NULL,
    updated_at            TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_styles_user ON journalist_styles(user_id);

CREATE TABLE IF NOT EXISTS article_rewrites (
    id                   TEXT PRIMARY KEY,
    article_id           TEXT NOT NULL REFERENCES news_articles(id),
    journalist_style_id  TEXT NOT NULL REFERENCES journalist_styles(id),
    rewritten_content    TEXT NOT NULL,
    style_applied        TEXT NOT NULL,
    tone_adjustment      TEXT NOT NULL DEFAULT 'none',
    readability_score    REAL NOT NULL,
    engagement_potential TEXT NOT NULL,
    word_count           INTEGER NOT NULL,
    reading_time_minutes INTEGER NOT NULL,
    improvement_score    INTEGER NOT NULL,
    suggestions          TEXT NOT NULL DEFAULT '[]',
    created_at           TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS conversations (
    id           TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES users(id),
    title        TEXT,
    description  TEXT,
    context_type TEXT,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS messages (
    id              TEXT PRIMARY KEY,
    conversation_id TEXT NOT NULL REFERENCES conversations(id),
    user_id         TEXT NOT NULL REFERENCES users(id),
    role            TEXT NOT NULL,
    content         TEXT NOT NULL,
    metadata        TEXT,
    created_at      TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_messages_conversation ON messages(conversation_id, created_at);

CREATE TABLE IF NOT EXISTS copilot_sessions (
    id           TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES users(id),
    context_data TEXT NOT NULL DEFAULT '{}',
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS copilot_interactions (
    id         TEXT PRIMARY KEY,
    session_id TEXT NOT NULL REFERENCES copilot_sessions(id),
    user_id    TEXT NOT NULL REFERENCES users(id),
    query      TEXT NOT NULL,
    response   TEXT NOT NULL,
    context    TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS seo_projects (
    id               TEXT PRIMARY KEY,
    user_id          TEXT NOT NULL REFERENCES users(id),
    name             TEXT NOT NULL,
    domain           TEXT,
    description      TEXT,
    industry         TEXT,
    target_audience  TEXT,
    brand_tone       TEXT,
    primary_language TEXT NOT NULL DEFAULT 'en',
    project_type     TEXT NOT NULL DEFAULT 'blog',
    created_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS project_knowledge (
    id         TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES seo_projects(id),
    title      TEXT NOT NULL,
    content    TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS seo_articles (
    id                    TEXT PRIMARY KEY,
    project_id            TEXT NOT NULL REFERENCES seo_projects(id),
    title                 TEXT NOT NULL,
    slug                  TEXT NOT NULL,
    content               TEXT NOT NULL,
    meta_title            TEXT NOT NULL,
    meta_description      TEXT NOT NULL,
    language              TEXT NOT NULL DEFAULT 'en',
    keywords              TEXT NOT NULL DEFAULT '[]',
    target_keyword        TEXT NOT NULL,
    word_count            INTEGER NOT NULL,
    reading_time          TEXT NOT NULL,
    has_table_of_contents INTEGER NOT NULL DEFAULT 0,
    has_faq               INTEGER NOT NULL DEFAULT 0,
    internal_links_count  INTEGER NOT NULL DEFAULT 0,
    external_links_count  INTEGER NOT NULL DEFAULT 0,
    images_count          INTEGER NOT NULL DEFAULT 0,
    status                TEXT NOT NULL DEFAULT 'review',
    created_at            TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_seo_articles_project ON seo_articles(project_id, created_at);

CREATE TABLE IF NOT EXISTS article_quality_checks (
    id                TEXT PRIMARY KEY,
    article_id        TEXT NOT NULL REFERENCES seo_articles(id),
    plagiarism_score  REAL NOT NULL DEFAULT 0,
    grammar_errors    INTEGER NOT NULL DEFAULT 0,
    readability_score REAL NOT NULL,
    seo_score         REAL NOT NULL,
    eeat_score        REAL NOT NULL,
    passed            INTEGER NOT NULL,
    created_at        TEXT NOT NULL
);
"#;

pub(super) fn migrate(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch(SCHEMA)
        .map_err(|e| AppError::Db(format!("schema bootstrap failed: {e}")))
}
