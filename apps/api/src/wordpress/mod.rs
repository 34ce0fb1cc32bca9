//! WordPress REST client — the single point of entry for all calls to a
//! connected site. Wraps `wp-json/wp/v2/*` (posts, media, terms, users) and
//! the site's `content-search/v1` companion plugin endpoint, authenticated
//! with an application password.

pub mod publish;

use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::website::WebsiteRow;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum WpError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WordPress API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
pub struct WpUser {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct WpPost {
    pub id: i64,
    pub link: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WpMedia {
    pub id: i64,
    pub source_url: String,
}

#[derive(Debug, Deserialize)]
pub struct WpTerm {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RelatedPost {
    pub id: i64,
    pub title: String,
    pub url: String,
}

/// Body for creating or updating a post. SEO meta fields ride along in `meta`.
#[derive(Debug, Serialize)]
pub struct PostPayload {
    pub title: String,
    pub content: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_media: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// One client per (site, credentials) pair, built from a `websites` row.
pub struct WpClient {
    http: Client,
    base_url: String,
    username: String,
    app_password: String,
}

#[derive(Debug, Deserialize)]
struct WpErrorBody {
    message: String,
}

impl WpClient {
    pub fn new(url: &str, username: &str, app_password: &str) -> Self {
        Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            app_password: app_password.to_string(),
        }
    }

    pub fn for_website(website: &WebsiteRow) -> Self {
        Self::new(&website.url, &website.username, &website.app_password)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/wp-json/{path}", self.base_url)
    }

    /// Checks the credentials by fetching the authenticated user.
    pub async fn verify(&self) -> Result<WpUser, WpError> {
        let response = self
            .http
            .get(self.api_url("wp/v2/users/me"))
            .basic_auth(&self.username, Some(&self.app_password))
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn create_post(&self, payload: &PostPayload) -> Result<WpPost, WpError> {
        debug!("Creating post \"{}\" on {}", payload.title, self.base_url);
        let response = self
            .http
            .post(self.api_url("wp/v2/posts"))
            .basic_auth(&self.username, Some(&self.app_password))
            .json(payload)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn update_post(&self, post_id: i64, payload: &PostPayload) -> Result<WpPost, WpError> {
        debug!("Updating post {post_id} on {}", self.base_url);
        let response = self
            .http
            .post(self.api_url(&format!("wp/v2/posts/{post_id}")))
            .basic_auth(&self.username, Some(&self.app_password))
            .json(payload)
            .send()
            .await?;
        read_json(response).await
    }

    /// Uploads a media file; WordPress takes the raw bytes with a
    /// content-disposition filename.
    pub async fn upload_media(
        &self,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<WpMedia, WpError> {
        let response = self
            .http
            .post(self.api_url("wp/v2/media"))
            .basic_auth(&self.username, Some(&self.app_password))
            .header("content-type", content_type)
            .header(
                "content-disposition",
                format!("attachment; filename=\"{filename}\""),
            )
            .body(data)
            .send()
            .await?;
        read_json(response).await
    }

    /// Finds a category by name, creating it when missing. Returns the term id.
    pub async fn ensure_category(&self, name: &str) -> Result<i64, WpError> {
        self.ensure_term("wp/v2/categories", name).await
    }

    /// Finds a tag by name, creating it when missing. Returns the term id.
    pub async fn ensure_tag(&self, name: &str) -> Result<i64, WpError> {
        self.ensure_term("wp/v2/tags", name).await
    }

    async fn ensure_term(&self, endpoint: &str, name: &str) -> Result<i64, WpError> {
        let response = self
            .http
            .get(self.api_url(endpoint))
            .basic_auth(&self.username, Some(&self.app_password))
            .query(&[("search", name)])
            .send()
            .await?;
        let matches: Vec<WpTerm> = read_json(response).await?;

        if let Some(term) = matches
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
        {
            return Ok(term.id);
        }

        let response = self
            .http
            .post(self.api_url(endpoint))
            .basic_auth(&self.username, Some(&self.app_password))
            .json(&serde_json::json!({ "name": name.trim() }))
            .send()
            .await?;
        let created: WpTerm = read_json(response).await?;
        Ok(created.id)
    }

    /// Queries the site's content-search companion plugin for related posts.
    pub async fn search_related(&self, keyword: &str) -> Result<Vec<RelatedPost>, WpError> {
        let response = self
            .http
            .get(self.api_url("content-search/v1/related"))
            .basic_auth(&self.username, Some(&self.app_password))
            .query(&[("keyword", keyword)])
            .send()
            .await?;
        read_json(response).await
    }
}

/// Reads a response body, mapping non-2xx statuses to `WpError::Api` with the
/// WordPress error message when one is present.
async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, WpError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<WpErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        return Err(WpError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let client = WpClient::new("https://example.com/", "admin", "pw");
        assert_eq!(
            client.api_url("wp/v2/posts"),
            "https://example.com/wp-json/wp/v2/posts"
        );
    }

    #[test]
    fn test_post_payload_omits_empty_collections() {
        let payload = PostPayload {
            title: "T".to_string(),
            content: "C".to_string(),
            status: "draft".to_string(),
            excerpt: None,
            categories: vec![],
            tags: vec![],
            featured_media: None,
            meta: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("categories").is_none());
        assert!(json.get("tags").is_none());
        assert!(json.get("excerpt").is_none());
        assert_eq!(json["status"], "draft");
    }

    #[test]
    fn test_post_payload_carries_seo_meta() {
        let payload = PostPayload {
            title: "T".to_string(),
            content: "C".to_string(),
            status: "publish".to_string(),
            excerpt: Some("E".to_string()),
            categories: vec![3],
            tags: vec![7, 9],
            featured_media: Some(42),
            meta: Some(serde_json::json!({ "_yoast_wpseo_focuskw": "espresso" })),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["meta"]["_yoast_wpseo_focuskw"], "espresso");
        assert_eq!(json["tags"], serde_json::json!([7, 9]));
    }
}
