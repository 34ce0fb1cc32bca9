pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::state::AppState;
use crate::{articles, generation, translation, websites, wordpress};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Article API
        .route(
            "/api/v1/articles",
            get(articles::handle_list).post(articles::handle_create),
        )
        .route("/api/v1/articles/:id", get(articles::handle_get))
        .route(
            "/api/v1/articles/:id/status",
            patch(articles::handle_update_status),
        )
        .route(
            "/api/v1/articles/:id/analyze",
            post(articles::handle_analyze),
        )
        // Generation API
        .route(
            "/api/v1/articles/generate",
            post(generation::handlers::handle_generate_article),
        )
        .route(
            "/api/v1/articles/titles",
            post(generation::handlers::handle_generate_titles),
        )
        // Translation API
        .route(
            "/api/v1/translations",
            post(translation::handlers::handle_start),
        )
        .route(
            "/api/v1/translations/:job_id",
            get(translation::handlers::handle_status),
        )
        .route(
            "/api/v1/translations/:job_id/pause",
            post(translation::handlers::handle_pause),
        )
        .route(
            "/api/v1/translations/:job_id/resume",
            post(translation::handlers::handle_resume),
        )
        // Website API
        .route(
            "/api/v1/websites",
            get(websites::handle_list).post(websites::handle_create),
        )
        .route("/api/v1/websites/:id", delete(websites::handle_delete))
        .route("/api/v1/websites/:id/verify", post(websites::handle_verify))
        .route(
            "/api/v1/websites/:id/related",
            get(websites::handle_related),
        )
        .route(
            "/api/v1/websites/:id/media",
            post(websites::handle_upload_media),
        )
        .route(
            "/api/v1/websites/:id/publish",
            post(wordpress::publish::handle_publish),
        )
        .with_state(state)
}
