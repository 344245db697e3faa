//! User accounts, auth sessions, credits, and copilot preferences.

use rusqlite::{params, OptionalExtension};
use serde::Serialize;

use crate::error::AppError;

use super::{json_column, new_id, now, Db};

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub full_name: String,
    pub plan: String,
    pub credits_balance: f64,
    pub credits_used_today: f64,
    pub total_revenue_generated: f64,
    pub copilot_preferences: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        email: row.get("email")?,
        password_digest: row.get("password_digest")?,
        full_name: row.get("full_name")?,
        plan: row.get("plan")?,
        credits_balance: row.get("credits_balance")?,
        credits_used_today: row.get("credits_used_today")?,
        total_revenue_generated: row.get("total_revenue_generated")?,
        copilot_preferences: json_column(row.get("copilot_preferences")?),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

const USER_COLS: &str = "id, email, password_digest, full_name, plan, credits_balance, \
     credits_used_today, total_revenue_generated, copilot_preferences, created_at, updated_at";

impl Db {
    pub fn create_user(
        &self,
        email: &str,
        password_digest: &str,
        full_name: &str,
    ) -> Result<User, AppError> {
        let id = new_id();
        let ts = now();
        self.conn().execute(
            "INSERT INTO users (id, email, password_digest, full_name, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![id, email, password_digest, full_name, ts],
        )?;
        self.user_by_id(&id)?
            .ok_or_else(|| AppError::Db("user vanished after insert".into()))
    }

    pub fn user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("SELECT {USER_COLS} FROM users WHERE id = ?1"))?;
        Ok(stmt.query_row(params![id], row_to_user).optional()?)
    }

    pub fn user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("SELECT {USER_COLS} FROM users WHERE email = ?1"))?;
        Ok(stmt.query_row(params![email], row_to_user).optional()?)
    }

    // ── Sessions ──────────────────────────────────────────────────────

    pub fn create_auth_session(
        &self,
        user_id: &str,
        token_digest: &str,
        expires_at: &str,
    ) -> Result<(), AppError> {
        self.conn().execute(
            "INSERT INTO auth_sessions (token_digest, user_id, created_at, expires_at) \
             VALUES (?1, ?2, ?3, ?4)",
            params![token_digest, user_id, now(), expires_at],
        )?;
        Ok(())
    }

    /// Resolve a bearer token digest to its user, rejecting expired sessions.
    pub fn user_by_session(&self, token_digest: &str) -> Result<Option<User>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLS} FROM users u \
             JOIN auth_sessions s ON s.user_id = u.id \
             WHERE s.token_digest = ?1 AND s.expires_at > ?2"
        ))?;
        Ok(stmt
            .query_row(params![token_digest, now()], row_to_user)
            .optional()?)
    }

    // ── Credits & preferences ─────────────────────────────────────────

    /// Debit credits for a billable operation. Balance may go negative —
    /// billing is advisory, not gating.
    pub fn debit_credits(&self, user_id: &str, amount: f64) -> Result<(), AppError> {
        self.conn().execute(
            "UPDATE users SET credits_balance = credits_balance - ?2, \
             credits_used_today = credits_used_today + ?2, updated_at = ?3 \
             WHERE id = ?1",
            params![user_id, amount, now()],
        )?;
        Ok(())
    }

    pub fn update_preferences(
        &self,
        user_id: &str,
        preferences: &serde_json::Value,
    ) -> Result<(), AppError> {
        self.conn().execute(
            "UPDATE users SET copilot_preferences = ?2, updated_at = ?3 WHERE id = ?1",
            params![user_id, preferences.to_string(), now()],
        )?;
        Ok(())
    }

    pub fn add_revenue(&self, user_id: &str, amount: f64) -> Result<(), AppError> {
        self.conn().execute(
            "UPDATE users SET total_revenue_generated = total_revenue_generated + ?2, \
             updated_at = ?3 WHERE id = ?1",
            params![user_id, amount, now()],
        )?;
        Ok(())
    }
}
