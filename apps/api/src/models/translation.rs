use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted per-language copy of an article, linked by (article_id, language).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TranslationRow {
    pub id: Uuid,
    pub article_id: Uuid,
    pub language: String,
    pub title: String,
    pub content: String,
    pub meta_description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
