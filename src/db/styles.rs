//! Journalist style library.
//!
//! The one cross-row invariant in the schema lives here: a user has at most
//! one default style. Setting a default clears the others inside the same
//! transaction as the write.

use rusqlite::{params, OptionalExtension};
use serde::Serialize;

use crate::error::AppError;

use super::{json_column, new_id, now, Db};

#[derive(Debug, Clone, Serialize)]
pub struct JournalistStyle {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub tone: Option<String>,
    pub style_characteristics: serde_json::Value,
    pub training_text_1: Option<String>,
    pub training_text_2: Option<String>,
    pub training_text_3: Option<String>,
    pub is_default: bool,
    pub usage_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Create/update payload for [`Db::upsert_style`].
#[derive(Debug, Clone, Default)]
pub struct StyleUpsert {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub tone: Option<String>,
    pub style_characteristics: serde_json::Value,
    pub training_text_1: Option<String>,
    pub training_text_2: Option<String>,
    pub training_text_3: Option<String>,
    pub is_default: bool,
}

const STYLE_COLS: &str = "id, user_id, name, description, tone, style_characteristics, \
     training_text_1, training_text_2, training_text_3, is_default, usage_count, \
     created_at, updated_at";

fn row_to_style(row: &rusqlite::Row<'_>) -> rusqlite::Result<JournalistStyle> {
    Ok(JournalistStyle {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        tone: row.get("tone")?,
        style_characteristics: json_column(row.get("style_characteristics")?),
        training_text_1: row.get("training_text_1")?,
        training_text_2: row.get("training_text_2")?,
        training_text_3: row.get("training_text_3")?,
        is_default: row.get::<_, i64>("is_default")? != 0,
        usage_count: row.get("usage_count")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

impl Db {
    /// Styles for a user, default first, then most used.
    pub fn list_styles(&self, user_id: &str) -> Result<Vec<JournalistStyle>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {STYLE_COLS} FROM journalist_styles WHERE user_id = ?1 \
             ORDER BY is_default DESC, usage_count DESC"
        ))?;
        let rows = stmt
            .query_map(params![user_id], row_to_style)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn style_by_id(&self, id: &str) -> Result<Option<JournalistStyle>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {STYLE_COLS} FROM journalist_styles WHERE id = ?1"
        ))?;
        Ok(stmt.query_row(params![id], row_to_style).optional()?)
    }

    pub fn default_style(&self, user_id: &str) -> Result<Option<JournalistStyle>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {STYLE_COLS} FROM journalist_styles \
             WHERE user_id = ?1 AND is_default = 1"
        ))?;
        Ok(stmt.query_row(params![user_id], row_to_style).optional()?)
    }

    /// Insert or update a style. When `is_default` is set, every other style
    /// of the user is cleared first — same transaction, so the single-default
    /// invariant holds even across concurrent writers.
    pub fn upsert_style(
        &self,
        user_id: &str,
        upsert: StyleUpsert,
    ) -> Result<JournalistStyle, AppError> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let ts = now();

        if upsert.is_default {
            tx.execute(
                "UPDATE journalist_styles SET is_default = 0 WHERE user_id = ?1",
                params![user_id],
            )?;
        }

        let id = match upsert.id {
            Some(id) => {
                let updated = tx.execute(
                    "UPDATE journalist_styles SET name = ?3, description = ?4, tone = ?5, \
                     style_characteristics = ?6, training_text_1 = ?7, training_text_2 = ?8, \
                     training_text_3 = ?9, is_default = ?10, updated_at = ?11 \
                     WHERE id = ?1 AND user_id = ?2",
                    params![
                        id,
                        user_id,
                        upsert.name,
                        upsert.description,
                        upsert.tone,
                        upsert.style_characteristics.to_string(),
                        upsert.training_text_1,
                        upsert.training_text_2,
                        upsert.training_text_3,
                        upsert.is_default as i64,
                        ts,
                    ],
                )?;
                if updated == 0 {
                    return Err(AppError::Db(format!("style not found: {id}")));
                }
                id
            }
            None => {
                let id = new_id();
                tx.execute(
                    "INSERT INTO journalist_styles (id, user_id, name, description, tone, \
                     style_characteristics, training_text_1, training_text_2, training_text_3, \
                     is_default, usage_count, created_at, updated_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, ?11, ?11)",
                    params![
                        id,
                        user_id,
                        upsert.name,
                        upsert.description,
                        upsert.tone,
                        upsert.style_characteristics.to_string(),
                        upsert.training_text_1,
                        upsert.training_text_2,
                        upsert.training_text_3,
                        upsert.is_default as i64,
                        ts,
                    ],
                )?;
                id
            }
        };
        tx.commit()?;
        drop(conn);

        self.style_by_id(&id)?
            .ok_or_else(|| AppError::Db("style vanished after write".into()))
    }

    pub fn bump_style_usage(&self, style_id: &str) -> Result<(), AppError> {
        self.conn().execute(
            "UPDATE journalist_styles SET usage_count = usage_count + 1, updated_at = ?2 \
             WHERE id = ?1",
            params![style_id, now()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (Db, String) {
        let db = Db::open_in_memory().unwrap();
        let u = db.create_user("a@b.c", "d", "Ada").unwrap();
        (db, u.id)
    }

    fn style(name: &str, is_default: bool) -> StyleUpsert {
        StyleUpsert {
            name: name.to_string(),
            tone: Some("conversational".to_string()),
            style_characteristics: serde_json::json!({"sentence_length": "short"}),
            is_default,
            ..Default::default()
        }
    }

    #[test]
    fn at_most_one_default_per_user() {
        let (db, uid) = seeded();
        let a = db.upsert_style(&uid, style("Tech Blogger", true)).unwrap();
        assert!(a.is_default);

        let b = db.upsert_style(&uid, style("Formal Reporter", true)).unwrap();
        assert!(b.is_default);

        let defaults: Vec<_> = db
            .list_styles(&uid)
            .unwrap()
            .into_iter()
            .filter(|s| s.is_default)
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, b.id);
    }

    #[test]
    fn update_existing_style() {
        let (db, uid) = seeded();
        let a = db.upsert_style(&uid, style("Tech Blogger", false)).unwrap();

        let mut edit = style("Tech Blogger v2", false);
        edit.id = Some(a.id.clone());
        let updated = db.upsert_style(&uid, edit).unwrap();
        assert_eq!(updated.id, a.id);
        assert_eq!(updated.name, "Tech Blogger v2");
    }

    #[test]
    fn update_unknown_style_errors() {
        let (db, uid) = seeded();
        let mut edit = style("ghost", false);
        edit.id = Some("missing".to_string());
        assert!(db.upsert_style(&uid, edit).is_err());
    }

    #[test]
    fn ordering_default_then_usage() {
        let (db, uid) = seeded();
        let a = db.upsert_style(&uid, style("A", false)).unwrap();
        let _b = db.upsert_style(&uid, style("B", true)).unwrap();
        db.bump_style_usage(&a.id).unwrap();
        db.bump_style_usage(&a.id).unwrap();

        let listed = db.list_styles(&uid).unwrap();
        assert_eq!(listed[0].name, "B"); // default wins over usage
        assert_eq!(listed[1].name, "A");
        assert_eq!(listed[1].usage_count, 2);
    }
}
