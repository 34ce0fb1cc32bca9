//! Axum route handlers for article CRUD and on-demand SEO analysis.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::html::count_words_in_html;
use crate::errors::AppError;
use crate::models::article::{ArticleRow, ArticleStatus};
use crate::models::translation::TranslationRow;
use crate::seo::readability::{self, ReadabilityReport};
use crate::seo::scoring::{self, SeoReport};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub focus_keyword: String,
    pub content: String,
    pub language: Option<String>,
    pub website_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ListArticlesQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ArticleDetailResponse {
    pub article: ArticleRow,
    pub translations: Vec<TranslationRow>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub article_id: Uuid,
    pub seo: SeoReport,
    pub readability: ReadabilityReport,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/articles
///
/// Creates a draft from an existing piece of content (e.g. an imported or
/// hand-written article) and scores it on the way in.
pub async fn handle_create(
    State(state): State<AppState>,
    Json(request): Json<CreateArticleRequest>,
) -> Result<Json<ArticleRow>, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if request.focus_keyword.trim().is_empty() {
        return Err(AppError::Validation(
            "focus_keyword cannot be empty".to_string(),
        ));
    }

    let language = request.language.unwrap_or_else(|| "English".to_string());
    let seo = scoring::analyze(&request.title, &request.content, &request.focus_keyword);
    let word_count = count_words_in_html(&request.content);
    let seo_data = serde_json::to_value(&seo)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize SEO report: {e}")))?;

    let article = sqlx::query_as::<_, ArticleRow>(
        r#"
        INSERT INTO articles
            (id, title, focus_keyword, content, status, language, word_count, seo_score, seo_data, website_id)
        VALUES ($1, $2, $3, $4, 'draft', $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(request.title.trim())
    .bind(request.focus_keyword.trim())
    .bind(&request.content)
    .bind(&language)
    .bind(word_count as i32)
    .bind(seo.score as i32)
    .bind(&seo_data)
    .bind(request.website_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(article))
}

/// GET /api/v1/articles?status=draft
pub async fn handle_list(
    State(state): State<AppState>,
    Query(query): Query<ListArticlesQuery>,
) -> Result<Json<Vec<ArticleRow>>, AppError> {
    let articles = match query.status.as_deref() {
        Some(status) => {
            if ArticleStatus::parse(status).is_none() {
                return Err(AppError::Validation(format!(
                    "Unknown article status '{status}'"
                )));
            }
            sqlx::query_as::<_, ArticleRow>(
                "SELECT * FROM articles WHERE status = $1 ORDER BY created_at DESC LIMIT 100",
            )
            .bind(status)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as::<_, ArticleRow>(
                "SELECT * FROM articles ORDER BY created_at DESC LIMIT 100",
            )
            .fetch_all(&state.db)
            .await?
        }
    };

    Ok(Json(articles))
}

/// GET /api/v1/articles/:id
///
/// Returns the article and all persisted translations.
pub async fn handle_get(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
) -> Result<Json<ArticleDetailResponse>, AppError> {
    let article = sqlx::query_as::<_, ArticleRow>("SELECT * FROM articles WHERE id = $1")
        .bind(article_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Article {article_id} not found")))?;

    let translations = sqlx::query_as::<_, TranslationRow>(
        "SELECT * FROM translations WHERE article_id = $1 ORDER BY language",
    )
    .bind(article_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ArticleDetailResponse {
        article,
        translations,
    }))
}

/// PATCH /api/v1/articles/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ArticleRow>, AppError> {
    let status = ArticleStatus::parse(&request.status).ok_or_else(|| {
        AppError::Validation(format!("Unknown article status '{}'", request.status))
    })?;

    let article = sqlx::query_as::<_, ArticleRow>(
        "UPDATE articles SET status = $1, updated_at = now() WHERE id = $2 RETURNING *",
    )
    .bind(status.as_str())
    .bind(article_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Article {article_id} not found")))?;

    Ok(Json(article))
}

/// POST /api/v1/articles/:id/analyze
///
/// Recomputes the SEO and readability reports and persists the SEO result.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let article = sqlx::query_as::<_, ArticleRow>("SELECT * FROM articles WHERE id = $1")
        .bind(article_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Article {article_id} not found")))?;

    let seo = scoring::analyze(&article.title, &article.content, &article.focus_keyword);
    let readability = readability::analyze(&article.content);

    let seo_data = serde_json::to_value(&seo)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize SEO report: {e}")))?;

    sqlx::query(
        "UPDATE articles SET seo_score = $1, seo_data = $2, updated_at = now() WHERE id = $3",
    )
    .bind(seo.score as i32)
    .bind(&seo_data)
    .bind(article_id)
    .execute(&state.db)
    .await?;

    Ok(Json(AnalyzeResponse {
        article_id,
        seo,
        readability,
    }))
}
