//! Copilot conversations and their message history.

use rusqlite::{params, OptionalExtension};
use serde::Serialize;

use crate::error::AppError;

use super::{new_id, now, Db};

#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub context_type: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub user_id: String,
    pub role: String,
    pub content: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: String,
}

fn row_to_conversation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        context_type: row.get("context_type")?,
        created_at: row.get("created_at")?,
    })
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let metadata_raw: Option<String> = row.get("metadata")?;
    Ok(Message {
        id: row.get("id")?,
        conversation_id: row.get("conversation_id")?,
        user_id: row.get("user_id")?,
        role: row.get("role")?,
        content: row.get("content")?,
        metadata: metadata_raw.and_then(|s| serde_json::from_str(&s).ok()),
        created_at: row.get("created_at")?,
    })
}

impl Db {
    pub fn create_conversation(
        &self,
        user_id: &str,
        title: Option<&str>,
        description: Option<&str>,
        context_type: Option<&str>,
    ) -> Result<Conversation, AppError> {
        let id = new_id();
        let ts = now();
        self.conn().execute(
            "INSERT INTO conversations (id, user_id, title, description, context_type, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, user_id, title, description, context_type, ts],
        )?;
        Ok(Conversation {
            id,
            user_id: user_id.to_string(),
            title: title.map(ToString::to_string),
            description: description.map(ToString::to_string),
            context_type: context_type.map(ToString::to_string),
            created_at: ts,
        })
    }

    pub fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, description, context_type, created_at \
             FROM conversations WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt
            .query_map(params![user_id], row_to_conversation)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn conversation_by_id(&self, id: &str) -> Result<Option<Conversation>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, description, context_type, created_at \
             FROM conversations WHERE id = ?1",
        )?;
        Ok(stmt.query_row(params![id], row_to_conversation).optional()?)
    }

    pub fn insert_message(
        &self,
        conversation_id: &str,
        user_id: &str,
        role: &str,
        content: &str,
        metadata: Option<&serde_json::Value>,
    ) -> Result<Message, AppError> {
        let id = new_id();
        let ts = now();
        self.conn().execute(
            "INSERT INTO messages (id, conversation_id, user_id, role, content, metadata, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id,
                conversation_id,
                user_id,
                role,
                content,
                metadata.map(|m| m.to_string()),
                ts
            ],
        )?;
        Ok(Message {
            id,
            conversation_id: conversation_id.to_string(),
            user_id: user_id.to_string(),
            role: role.to_string(),
            content: content.to_string(),
            metadata: metadata.cloned(),
            created_at: ts,
        })
    }

    /// Full history for a conversation the user owns, oldest first.
    pub fn list_messages(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> Result<Vec<Message>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, conversation_id, user_id, role, content, metadata, created_at \
             FROM messages WHERE conversation_id = ?1 AND user_id = ?2 \
             ORDER BY created_at ASC",
        )?;
        let rows = stmt
            .query_map(params![conversation_id, user_id], row_to_message)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Last `limit` messages, oldest first — the prompt replay window.
    pub fn recent_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, conversation_id, user_id, role, content, metadata, created_at \
             FROM messages WHERE conversation_id = ?1 \
             ORDER BY created_at DESC LIMIT ?2",
        )?;
        let mut rows = stmt
            .query_map(params![conversation_id, limit as i64], row_to_message)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.reverse();
        Ok(rows)
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

    #[test]
    fn conversation_crud() {
        let (db, uid) = seeded();
        let c = db
            .create_conversation(&uid, Some("News ideas"), None, Some("copilot"))
            .unwrap();
        let listed = db.list_conversations(&uid).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, c.id);
        assert!(db.conversation_by_id("missing").unwrap().is_none());
    }

    #[test]
    fn messages_ordered_and_scoped() {
        let (db, uid) = seeded();
        let c = db.create_conversation(&uid, None, None, None).unwrap();
        db.insert_message(&c.id, &uid, "user", "hello", None).unwrap();
        db.insert_message(
            &c.id,
            &uid,
            "assistant",
            "hi",
            Some(&serde_json::json!({"tool_calls": []})),
        )
        .unwrap();

        let msgs = db.list_messages(&c.id, &uid).unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, "user");
        assert_eq!(msgs[1].metadata, Some(serde_json::json!({"tool_calls": []})));

        // other users see nothing
        let other = db.create_user("x@y.z", "d", "Eve").unwrap();
        assert!(db.list_messages(&c.id, &other.id).unwrap().is_empty());
    }

    #[test]
    fn recent_window_is_oldest_first() {
        let (db, uid) = seeded();
        let c = db.create_conversation(&uid, None, None, None).unwrap();
        for i in 0..5 {
            db.insert_message(&c.id, &uid, "user", &format!("m{i}"), None)
                .unwrap();
        }
        let recent = db.recent_messages(&c.id, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].content, "m3");
        assert_eq!(recent[1].content, "m4");
    }
}
