//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::generator::{generate_article, GenerateArticleRequest, GenerateArticleResponse};
use crate::generation::titles::{generate_titles, TitleCandidate, DEFAULT_TITLE_COUNT};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateTitlesRequest {
    pub topic: String,
    pub keyword: String,
    pub count: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct GenerateTitlesResponse {
    pub candidates: Vec<TitleCandidate>,
}

/// POST /api/v1/articles/generate
///
/// Full pipeline: outline → intro → budgeted sections → SEO score → draft row.
pub async fn handle_generate_article(
    State(state): State<AppState>,
    Json(request): Json<GenerateArticleRequest>,
) -> Result<Json<GenerateArticleResponse>, AppError> {
    let response = generate_article(&state.db, &state.llm, request).await?;
    Ok(Json(response))
}

/// POST /api/v1/articles/titles
///
/// Returns LLM title candidates annotated with length and keyword checks.
pub async fn handle_generate_titles(
    State(state): State<AppState>,
    Json(request): Json<GenerateTitlesRequest>,
) -> Result<Json<GenerateTitlesResponse>, AppError> {
    if request.topic.trim().is_empty() {
        return Err(AppError::Validation("topic cannot be empty".to_string()));
    }
    if request.keyword.trim().is_empty() {
        return Err(AppError::Validation("keyword cannot be empty".to_string()));
    }

    let count = request.count.unwrap_or(DEFAULT_TITLE_COUNT).clamp(1, 10);
    let candidates =
        generate_titles(&state.llm, &request.topic, &request.keyword, count).await?;

    Ok(Json(GenerateTitlesResponse { candidates }))
}
