//! Article entity and request payloads
//!
//! # Example
//!
//! ```rust
//! use article_service::articles::{Article, CreateArticleRequest};
//! use chrono::Utc;
//!
//! let request = CreateArticleRequest {
//!     title: "Ownership in practice".to_string(),
//!     content: "Borrowing rules explained with examples.".to_string(),
//!     author: "ferris".to_string(),
//!     tags: vec!["rust".to_string()],
//!     is_published: None,
//! };
//! assert!(request.validate().is_ok());
//!
//! let article = Article::new(request, Utc::now());
//! assert!(article.is_published);
//! assert_eq!(article.created_at, article.updated_at);
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Maximum title length in characters
pub const TITLE_MAX_LEN: usize = 200;

/// Minimum content length in characters
pub const CONTENT_MIN_LEN: usize = 10;

/// Opaque, server-generated article identifier
///
/// Backed by a UUIDv7 so identifiers sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(Uuid);

impl ArticleId {
    /// Generate a fresh identifier
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Access the underlying UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ArticleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ArticleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A blog article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub published_date: DateTime<Utc>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Build a new article from a validated create request
    ///
    /// All timestamps are set to `now`; the identifier is assigned here and
    /// never changes afterwards.
    #[must_use]
    pub fn new(request: CreateArticleRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: ArticleId::new(),
            title: request.title,
            content: request.content,
            author: request.author,
            tags: request.tags,
            published_date: now,
            is_published: request.is_published.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

/// Create article request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Defaults to published when omitted
    #[serde(default)]
    pub is_published: Option<bool>,
}

impl CreateArticleRequest {
    /// Validate the create request
    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)?;
        validate_content(&self.content)?;
        validate_author(&self.author)?;
        Ok(())
    }
}

/// Field presence for partial updates
///
/// Distinguishes a field the caller left out ([`Patch::Absent`]) from one
/// explicitly set to `null` ([`Patch::Null`]) and one carrying a value.
/// Use with `#[serde(default)]` so missing keys deserialize to `Absent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Key not present in the request; keep the stored value
    Absent,
    /// Key present with `null`; clear the stored value
    Null,
    /// Key present with a value; overwrite the stored value
    Value(T),
}

impl<T> Patch<T> {
    /// Whether the caller supplied the key at all
    #[must_use]
    pub const fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| value.map_or(Self::Null, Self::Value))
    }
}

/// Update article request body
///
/// Only present fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub content: Patch<String>,
    #[serde(default)]
    pub author: Patch<String>,
    #[serde(default)]
    pub tags: Patch<Vec<String>>,
    #[serde(default)]
    pub is_published: Patch<bool>,
}

impl UpdateArticleRequest {
    /// Check if the request has any updates
    pub fn has_updates(&self) -> bool {
        self.title.is_present()
            || self.content.is_present()
            || self.author.is_present()
            || self.tags.is_present()
            || self.is_published.is_present()
    }

    /// Validate the update request
    pub fn validate(&self) -> Result<(), String> {
        if !self.has_updates() {
            return Err("No updates provided".to_string());
        }
        match &self.title {
            Patch::Null => return Err("Title cannot be cleared".to_string()),
            Patch::Value(title) => validate_title(title)?,
            Patch::Absent => {}
        }
        match &self.content {
            Patch::Null => return Err("Content cannot be cleared".to_string()),
            Patch::Value(content) => validate_content(content)?,
            Patch::Absent => {}
        }
        match &self.author {
            Patch::Null => return Err("Author cannot be cleared".to_string()),
            Patch::Value(author) => validate_author(author)?,
            Patch::Absent => {}
        }
        if matches!(self.is_published, Patch::Null) {
            return Err("isPublished cannot be cleared".to_string());
        }
        Ok(())
    }

    /// Apply the present fields to `article`
    ///
    /// Call [`validate`](Self::validate) first; required fields set to
    /// `null` are left untouched here. Publishing a draft moves its
    /// `publishedDate` to `now`.
    #[must_use]
    pub fn apply(self, mut article: Article, now: DateTime<Utc>) -> Article {
        if let Patch::Value(title) = self.title {
            article.title = title;
        }
        if let Patch::Value(content) = self.content {
            article.content = content;
        }
        if let Patch::Value(author) = self.author {
            article.author = author;
        }
        match self.tags {
            Patch::Value(tags) => article.tags = tags,
            Patch::Null => article.tags.clear(),
            Patch::Absent => {}
        }
        if let Patch::Value(is_published) = self.is_published {
            if is_published && !article.is_published {
                article.published_date = now;
            }
            article.is_published = is_published;
        }
        article.touch(now);
        article
    }
}

fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(format!("Title must be at most {} characters", TITLE_MAX_LEN));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Content is required".to_string());
    }
    if content.chars().count() < CONTENT_MIN_LEN {
        return Err(format!("Content must be at least {} characters", CONTENT_MIN_LEN));
    }
    Ok(())
}

fn validate_author(author: &str) -> Result<(), String> {
    if author.trim().is_empty() {
        return Err("Author is required".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_request() -> CreateArticleRequest {
        CreateArticleRequest {
            title: "Async Rust".to_string(),
            content: "Futures are lazy until polled.".to_string(),
            author: "alice".to_string(),
            tags: vec!["rust".to_string(), "async".to_string()],
            is_published: None,
        }
    }

    #[test]
    fn test_article_id_roundtrip_through_string() {
        let id = ArticleId::new();
        let parsed: ArticleId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_article_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<ArticleId>().is_err());
    }

    #[test]
    fn test_article_ids_are_time_ordered() {
        let first = ArticleId::new();
        let second = ArticleId::new();
        assert!(first < second);
    }

    #[test]
    fn test_new_article_defaults() {
        let now = Utc::now();
        let article = Article::new(create_request(), now);
        assert!(article.is_published);
        assert_eq!(article.published_date, now);
        assert_eq!(article.created_at, now);
        assert_eq!(article.updated_at, now);
        assert_eq!(article.tags, vec!["rust", "async"]);
    }

    #[test]
    fn test_new_article_as_draft() {
        let mut request = create_request();
        request.is_published = Some(false);
        let article = Article::new(request, Utc::now());
        assert!(!article.is_published);
    }

    #[test]
    fn test_article_json_shape() {
        let article = Article::new(create_request(), Utc::now());
        let json = serde_json::to_value(&article).unwrap();
        for key in [
            "id",
            "title",
            "content",
            "author",
            "tags",
            "publishedDate",
            "isPublished",
            "createdAt",
            "updatedAt",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(json["id"], article.id.to_string());
    }

    #[test]
    fn test_create_validation() {
        assert!(create_request().validate().is_ok());

        let mut request = create_request();
        request.title = "   ".to_string();
        assert_eq!(request.validate().unwrap_err(), "Title is required");

        let mut request = create_request();
        request.title = "x".repeat(TITLE_MAX_LEN + 1);
        assert!(request.validate().is_err());

        let mut request = create_request();
        request.content = "too short".to_string();
        assert!(request.validate().unwrap_err().contains("at least"));

        let mut request = create_request();
        request.author = String::new();
        assert_eq!(request.validate().unwrap_err(), "Author is required");
    }

    #[test]
    fn test_title_length_counts_characters() {
        let mut request = create_request();
        request.title = "é".repeat(TITLE_MAX_LEN);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_deserialize_defaults() {
        let request: CreateArticleRequest = serde_json::from_str(
            r#"{"title": "t", "content": "0123456789", "author": "bob"}"#,
        )
        .unwrap();
        assert!(request.tags.is_empty());
        assert!(request.is_published.is_none());
    }

    #[test]
    fn test_patch_deserialize_tri_state() {
        let request: UpdateArticleRequest =
            serde_json::from_str(r#"{"title": "New title", "tags": null}"#).unwrap();
        assert_eq!(request.title, Patch::Value("New title".to_string()));
        assert_eq!(request.tags, Patch::Null);
        assert_eq!(request.content, Patch::Absent);
        assert_eq!(request.is_published, Patch::Absent);
    }

    #[test]
    fn test_update_requires_some_field() {
        let request = UpdateArticleRequest::default();
        assert!(!request.has_updates());
        assert_eq!(request.validate().unwrap_err(), "No updates provided");
    }

    #[test]
    fn test_update_rejects_clearing_required_fields() {
        let request: UpdateArticleRequest = serde_json::from_str(r#"{"author": null}"#).unwrap();
        assert_eq!(request.validate().unwrap_err(), "Author cannot be cleared");

        let request: UpdateArticleRequest =
            serde_json::from_str(r#"{"isPublished": null}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_validates_values() {
        let request: UpdateArticleRequest =
            serde_json::from_str(r#"{"content": "short"}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_apply_keeps_absent_fields() {
        let created = Utc::now();
        let article = Article::new(create_request(), created);
        let request: UpdateArticleRequest =
            serde_json::from_str(r#"{"title": "Renamed"}"#).unwrap();

        let later = created + Duration::seconds(5);
        let updated = request.apply(article.clone(), later);
        assert_eq!(updated.id, article.id);
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.content, article.content);
        assert_eq!(updated.author, article.author);
        assert_eq!(updated.tags, article.tags);
        assert_eq!(updated.created_at, created);
        assert_eq!(updated.updated_at, later);
    }

    #[test]
    fn test_apply_null_tags_clears() {
        let article = Article::new(create_request(), Utc::now());
        let request: UpdateArticleRequest = serde_json::from_str(r#"{"tags": null}"#).unwrap();
        let updated = request.apply(article, Utc::now());
        assert!(updated.tags.is_empty());
    }

    #[test]
    fn test_apply_publishing_draft_sets_published_date() {
        let created = Utc::now();
        let mut request = create_request();
        request.is_published = Some(false);
        let draft = Article::new(request, created);

        let later = created + Duration::minutes(1);
        let update: UpdateArticleRequest =
            serde_json::from_str(r#"{"isPublished": true}"#).unwrap();
        let published = update.apply(draft, later);
        assert!(published.is_published);
        assert_eq!(published.published_date, later);
    }

    #[test]
    fn test_apply_never_moves_updated_before_created() {
        let created = Utc::now();
        let article = Article::new(create_request(), created);
        let update: UpdateArticleRequest =
            serde_json::from_str(r#"{"title": "Clock skew"}"#).unwrap();
        let updated = update.apply(article, created - Duration::hours(1));
        assert_eq!(updated.updated_at, created);
    }
}
