use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Editorial lifecycle of an article. Stored as text in Postgres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Draft,
    Pending,
    Published,
    Rejected,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Pending => "pending",
            ArticleStatus::Published => "published",
            ArticleStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(ArticleStatus::Draft),
            "pending" => Some(ArticleStatus::Pending),
            "published" => Some(ArticleStatus::Published),
            "rejected" => Some(ArticleStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ArticleRow {
    pub id: Uuid,
    pub title: String,
    pub focus_keyword: String,
    pub content: String,
    pub status: String,
    pub language: String,
    pub word_count: i32,
    pub seo_score: Option<i32>,
    /// Full SEO report (jsonb) as produced by `seo::scoring::analyze`.
    pub seo_data: Option<Value>,
    pub website_id: Option<Uuid>,
    pub wp_post_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            ArticleStatus::Draft,
            ArticleStatus::Pending,
            ArticleStatus::Published,
            ArticleStatus::Rejected,
        ] {
            assert_eq!(ArticleStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_unknown_status_is_none() {
        assert_eq!(ArticleStatus::parse("archived"), None);
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&ArticleStatus::Draft).unwrap();
        assert_eq!(json, "\"draft\"");
    }
}
