mod auth;
mod config;
mod db;
mod errors;
mod evaluation;
mod extraction;
mod llm_client;
mod models;
mod questions;
mod resume;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::tokens::TokenStore;
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::extraction::TextExtractor;
use crate::llm_client::LlmClient;
use crate::resume::ResumeStore;
use crate::routes::build_router;
use crate::session::store::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL credential store
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;

    // Initialize LLM client
    let llm = LlmClient::new(
        config.groq_api_key.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm_client::MODEL,
        config.llm_timeout_secs
    );

    let extractor = TextExtractor::new(config.ocr.clone());
    info!(
        "Text extractor ready (tesseract: {}, pdftoppm: {})",
        config.ocr.tesseract_cmd, config.ocr.pdftoppm_cmd
    );

    let session_ttl = Duration::from_secs(config.session_ttl_secs);
    let resume_ttl = Duration::from_secs(config.resume_ttl_secs);
    info!(
        "Session TTL {}s, resume TTL {}s",
        config.session_ttl_secs, config.resume_ttl_secs
    );

    // Build app state
    let state = AppState {
        db,
        llm: Arc::new(llm),
        extractor,
        sessions: SessionStore::with_ttl(session_ttl),
        resumes: ResumeStore::with_ttl(resume_ttl),
        tokens: TokenStore::with_ttl(session_ttl),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
