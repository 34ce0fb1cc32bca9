//! Axum route handlers for the Translation API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::article::ArticleRow;
use crate::state::AppState;
use crate::translation::driver::{resume_job, start_job};
use crate::translation::jobs::{JobProgress, JobStatus, SectionStatus};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartTranslationRequest {
    pub article_id: Uuid,
    pub target_language: String,
    pub source_language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartTranslationResponse {
    pub job_id: Uuid,
    pub total_sections: usize,
}

/// Per-section view without the content payloads.
#[derive(Debug, Serialize)]
pub struct SectionView {
    pub index: usize,
    pub title: String,
    pub status: SectionStatus,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: Uuid,
    pub article_id: Uuid,
    pub target_language: String,
    pub status: JobStatus,
    pub progress: JobProgress,
    pub translated_title: Option<String>,
    pub metadata_error: Option<String>,
    pub sections: Vec<SectionView>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/translations
///
/// Splits the article into sections and starts a background translation job.
pub async fn handle_start(
    State(state): State<AppState>,
    Json(request): Json<StartTranslationRequest>,
) -> Result<Json<StartTranslationResponse>, AppError> {
    if request.target_language.trim().is_empty() {
        return Err(AppError::Validation(
            "target_language cannot be empty".to_string(),
        ));
    }

    let article = sqlx::query_as::<_, ArticleRow>("SELECT * FROM articles WHERE id = $1")
        .bind(request.article_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Article {} not found", request.article_id)))?;

    let source_language = request
        .source_language
        .unwrap_or_else(|| article.language.clone());

    if source_language.eq_ignore_ascii_case(request.target_language.trim()) {
        return Err(AppError::Validation(
            "target_language must differ from the article language".to_string(),
        ));
    }

    let (job_id, total_sections) = start_job(
        state.db.clone(),
        state.translator.clone(),
        &state.jobs,
        &article,
        source_language,
        request.target_language.trim().to_string(),
    )
    .await?;

    Ok(Json(StartTranslationResponse {
        job_id,
        total_sections,
    }))
}

/// GET /api/v1/translations/:job_id
///
/// Returns per-section statuses and overall progress for a job.
pub async fn handle_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobStatusResponse>, AppError> {
    let handle = state
        .jobs
        .get(job_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Translation job {job_id} not found")))?;

    let job = handle.state.read().await;
    Ok(Json(JobStatusResponse {
        job_id: job.id,
        article_id: job.article_id,
        target_language: job.target_language.clone(),
        status: job.status,
        progress: job.progress(),
        translated_title: job.translated_title.clone(),
        metadata_error: job.metadata_error.clone(),
        sections: job
            .sections
            .iter()
            .map(|s| SectionView {
                index: s.index,
                title: s.title.clone(),
                status: s.status,
                error: s.error.clone(),
            })
            .collect(),
    }))
}

/// POST /api/v1/translations/:job_id/pause
///
/// Stops the loop before the next section; the in-flight call is not aborted.
pub async fn handle_pause(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let handle = state
        .jobs
        .get(job_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Translation job {job_id} not found")))?;

    {
        let job = handle.state.read().await;
        if job.status != JobStatus::Running {
            return Err(AppError::Conflict(format!(
                "Job {job_id} is not running (status: {:?})",
                job.status
            )));
        }
    }

    handle.request_pause();
    Ok(Json(serde_json::json!({ "job_id": job_id, "pausing": true })))
}

/// POST /api/v1/translations/:job_id/resume
///
/// Re-enters the loop at the first pending section.
pub async fn handle_resume(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let handle = state
        .jobs
        .get(job_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Translation job {job_id} not found")))?;

    resume_job(state.db.clone(), state.translator.clone(), handle).await?;
    Ok(Json(serde_json::json!({ "job_id": job_id, "resumed": true })))
}
