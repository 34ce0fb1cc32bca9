//! Axum route handlers for connected WordPress sites: registration,
//! credential verification, related-content lookup.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::website::WebsiteRow;
use crate::state::AppState;
use crate::wordpress::{RelatedPost, WpClient, WpMedia};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateWebsiteRequest {
    pub name: String,
    pub url: String,
    pub username: String,
    pub app_password: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub website_id: Uuid,
    pub verified: bool,
    pub wp_user: String,
}

#[derive(Debug, Deserialize)]
pub struct RelatedQuery {
    pub keyword: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadMediaQuery {
    pub filename: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/websites
pub async fn handle_create(
    State(state): State<AppState>,
    Json(request): Json<CreateWebsiteRequest>,
) -> Result<Json<WebsiteRow>, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    let url = request.url.trim().trim_end_matches('/').to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(AppError::Validation(
            "url must start with http:// or https://".to_string(),
        ));
    }
    if request.username.trim().is_empty() || request.app_password.trim().is_empty() {
        return Err(AppError::Validation(
            "username and app_password are required".to_string(),
        ));
    }

    let website = sqlx::query_as::<_, WebsiteRow>(
        r#"
        INSERT INTO websites (id, name, url, username, app_password, verified, article_count)
        VALUES ($1, $2, $3, $4, $5, false, 0)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(request.name.trim())
    .bind(&url)
    .bind(request.username.trim())
    .bind(request.app_password.trim())
    .fetch_one(&state.db)
    .await?;

    info!("Registered website {} ({})", website.name, website.url);
    Ok(Json(website))
}

/// GET /api/v1/websites
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<WebsiteRow>>, AppError> {
    let websites =
        sqlx::query_as::<_, WebsiteRow>("SELECT * FROM websites ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(websites))
}

/// POST /api/v1/websites/:id/verify
///
/// Calls the site's `users/me` endpoint with the stored application password
/// and records the result.
pub async fn handle_verify(
    State(state): State<AppState>,
    Path(website_id): Path<Uuid>,
) -> Result<Json<VerifyResponse>, AppError> {
    let website = sqlx::query_as::<_, WebsiteRow>("SELECT * FROM websites WHERE id = $1")
        .bind(website_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Website {website_id} not found")))?;

    let client = WpClient::for_website(&website);
    let user = client
        .verify()
        .await
        .map_err(|e| AppError::WordPress(e.to_string()))?;

    sqlx::query("UPDATE websites SET verified = true WHERE id = $1")
        .bind(website_id)
        .execute(&state.db)
        .await?;

    info!("Verified {} as WP user \"{}\"", website.url, user.name);
    Ok(Json(VerifyResponse {
        website_id,
        verified: true,
        wp_user: user.name,
    }))
}

/// GET /api/v1/websites/:id/related?keyword=...
///
/// Proxies the site's content-search plugin to suggest internal link targets.
pub async fn handle_related(
    State(state): State<AppState>,
    Path(website_id): Path<Uuid>,
    Query(query): Query<RelatedQuery>,
) -> Result<Json<Vec<RelatedPost>>, AppError> {
    if query.keyword.trim().is_empty() {
        return Err(AppError::Validation("keyword cannot be empty".to_string()));
    }

    let website = sqlx::query_as::<_, WebsiteRow>("SELECT * FROM websites WHERE id = $1")
        .bind(website_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Website {website_id} not found")))?;

    let client = WpClient::for_website(&website);
    let related = client
        .search_related(query.keyword.trim())
        .await
        .map_err(|e| AppError::WordPress(e.to_string()))?;

    Ok(Json(related))
}

/// POST /api/v1/websites/:id/media?filename=...
///
/// Forwards the raw request body to the site's media library. The request's
/// content-type header is passed through to WordPress.
pub async fn handle_upload_media(
    State(state): State<AppState>,
    Path(website_id): Path<Uuid>,
    Query(query): Query<UploadMediaQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WpMedia>, AppError> {
    if query.filename.trim().is_empty() {
        return Err(AppError::Validation("filename cannot be empty".to_string()));
    }
    if body.is_empty() {
        return Err(AppError::Validation(
            "request body cannot be empty".to_string(),
        ));
    }

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let website = sqlx::query_as::<_, WebsiteRow>("SELECT * FROM websites WHERE id = $1")
        .bind(website_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Website {website_id} not found")))?;

    let client = WpClient::for_website(&website);
    let media = client
        .upload_media(query.filename.trim(), &content_type, body)
        .await
        .map_err(|e| AppError::WordPress(e.to_string()))?;

    info!(
        "Uploaded media {} to {} as attachment {}",
        query.filename, website.url, media.id
    );
    Ok(Json(media))
}

/// DELETE /api/v1/websites/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(website_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query("DELETE FROM websites WHERE id = $1")
        .bind(website_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Website {website_id} not found"
        )));
    }

    Ok(Json(serde_json::json!({ "deleted": website_id })))
}
