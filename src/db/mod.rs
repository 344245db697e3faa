//! SQLite persistence layer.
//!
//! One [`Db`] handle wraps a mutex-guarded `rusqlite::Connection`; entity
//! modules add `impl Db` blocks with the store functions for their tables.
//! All calls are synchronous and short — queries run inline on the request
//! task. JSON-typed columns hold `serde_json` strings.

mod articles;
mod conversations;
mod copilot;
mod schema;
mod seo;
mod styles;
mod users;

pub use articles::{ArticleRewrite, NewsArticle, NewArticle, RevenueRow};
pub use conversations::{Conversation, Message};
pub use copilot::CopilotInteraction;
pub use seo::{NewSeoArticle, ProjectKnowledge, QualityCheck, SeoArticle, SeoProject};
pub use styles::{JournalistStyle, StyleUpsert};
pub use users::User;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::error::AppError;

/// Shared database handle. Cheap to clone.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    /// Open (or create) the database file and bootstrap the schema.
    pub fn open(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Db(format!("cannot create {}: {e}", parent.display()))
                })?;
            }
        }
        let conn = Connection::open(path)
            .map_err(|e| AppError::Db(format!("cannot open {}: {e}", path.display())))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::migrate(&conn)?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::migrate(&conn)?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        // A poisoned mutex means a panic mid-statement; continuing with the
        // connection is still sound for SQLite.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// RFC 3339 UTC timestamp for row columns.
pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Fresh row id.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Parse a JSON column, tolerating legacy/blank values.
pub(crate) fn json_column(raw: Option<String>) -> serde_json::Value {
    raw.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_in_memory_bootstraps_schema() {
        let db = Db::open_in_memory().unwrap();
        let count: i64 = db
            .conn()
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert!(count >= 12, "expected all tables, got {count}");
    }

    #[test]
    fn open_is_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cm.db");
        drop(Db::open(&path).unwrap());
        // Second open must not fail on existing tables.
        drop(Db::open(&path).unwrap());
    }

    #[test]
    fn json_column_tolerates_garbage() {
        assert_eq!(json_column(None), serde_json::Value::Null);
        assert_eq!(json_column(Some("not json".into())), serde_json::Value::Null);
        assert_eq!(
            json_column(Some("{\"a\":1}".into())),
            serde_json::json!({"a": 1})
        );
    }
}
