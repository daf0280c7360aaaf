use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::tokens::TokenStore;
use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::llm_client::CompletionModel;
use crate::resume::ResumeStore;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Hosted model behind the gateway trait. Production: `LlmClient`.
    pub llm: Arc<dyn CompletionModel>,
    pub extractor: TextExtractor,
    pub sessions: SessionStore,
    pub resumes: ResumeStore,
    pub tokens: TokenStore,
    pub config: Config,
}
