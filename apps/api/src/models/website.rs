use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A connected WordPress site, authenticated with an application password.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WebsiteRow {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub username: String,
    /// WordPress application password. Never serialized into API responses.
    #[serde(skip_serializing)]
    pub app_password: String,
    pub verified: bool,
    pub article_count: i32,
    pub last_published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
