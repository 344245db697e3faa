//! Advanced-copilot session and interaction audit rows.

use rusqlite::params;
use serde::Serialize;

use crate::error::AppError;

use super::{json_column, new_id, now, Db};

#[derive(Debug, Clone, Serialize)]
pub struct CopilotInteraction {
    pub id: String,
    pub session_id: String,
    pub user_id: String,
    pub query: String,
    pub response: String,
    pub context: serde_json::Value,
    pub created_at: String,
}

impl Db {
    pub fn create_copilot_session(
        &self,
        user_id: &str,
        context_data: &serde_json::Value,
    ) -> Result<String, AppError> {
        let id = new_id();
        self.conn().execute(
            "INSERT INTO copilot_sessions (id, user_id, context_data, created_at) \
             VALUES (?1, ?2, ?3, ?4)",
            params![id, user_id, context_data.to_string(), now()],
        )?;
        Ok(id)
    }

    pub fn insert_interaction(
        &self,
        session_id: &str,
        user_id: &str,
        query: &str,
        response: &str,
        context: &serde_json::Value,
    ) -> Result<String, AppError> {
        let id = new_id();
        self.conn().execute(
            "INSERT INTO copilot_interactions (id, session_id, user_id, query, response, \
             context, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![id, session_id, user_id, query, response, context.to_string(), now()],
        )?;
        Ok(id)
    }

    pub fn update_interaction_response(
        &self,
        interaction_id: &str,
        response: &str,
    ) -> Result<(), AppError> {
        self.conn().execute(
            "UPDATE copilot_interactions SET response = ?2 WHERE id = ?1",
            params![interaction_id, response],
        )?;
        Ok(())
    }

    pub fn interactions_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<CopilotInteraction>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, session_id, user_id, query, response, context, created_at \
             FROM copilot_interactions WHERE user_id = ?1 ORDER BY created_at ASC",
        )?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(CopilotInteraction {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    user_id: row.get(2)?,
                    query: row.get(3)?,
                    response: row.get(4)?,
                    context: json_column(row.get(5)?),
                    created_at: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
