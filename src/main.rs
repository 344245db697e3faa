//! ContentMaster — service entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config (path from argv[1], else config/default.toml)
//!   3. Init logger at the configured level
//!   4. Open the database
//!   5. Build providers + router + state
//!   6. Serve until ctrl-c

use tokio_util::sync::CancellationToken;
use tracing::info;

use contentmaster::config;
use contentmaster::db::Db;
use contentmaster::error::AppError;
use contentmaster::http::{self, AppState};
use contentmaster::llm::router::ModelRouter;
use contentmaster::logger;
use contentmaster::news::NewsClient;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config_path = std::env::args().nth(1);
    let config = config::load(config_path.as_deref())?;

    logger::parse_level(&config.log_level)?;
    logger::init(&config.log_level, true)?;

    info!(
        service = %config.service_name,
        bind = %config.server.bind,
        log_level = %config.log_level,
        llm_preference = %config.llm.preference,
        "config loaded"
    );

    let db = Db::open(&config.database_path())?;
    info!(path = %config.database_path().display(), "database ready");

    let model_router = ModelRouter::new(
        &config.llm,
        config.llm_api_key.clone(),
        config.groq_api_key.clone(),
    )
    .map_err(|e| AppError::Config(e.to_string()))?;

    let news = NewsClient::new(&config.news, config.newsapi_key.clone())?;
    let state = AppState::new(config, db, model_router, news);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Server(format!("runtime build failed: {e}")))?;

    runtime.block_on(async {
        let shutdown = CancellationToken::new();
        let signal_token = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
                signal_token.cancel();
            }
        });

        http::serve(state, shutdown).await
    })
}
