use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::translation::jobs::JobRegistry;
use crate::translation::Translator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    pub config: Config,
    /// Pluggable translation backend. Default: `LlmTranslator` over the Gemini client.
    pub translator: Arc<dyn Translator>,
    /// In-memory registry of section-by-section translation jobs.
    pub jobs: JobRegistry,
}
