//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("database error: {0}")]
    Db(String),

    #[error("auth error: {0}")]
    Auth(String),

    #[error("llm error: {0}")]
    Llm(String),

    #[error("news error: {0}")]
    News(String),

    #[error("tool error: {0}")]
    Tool(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Db(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Db(format!("json column: {e}"))
    }
}
