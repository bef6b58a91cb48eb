//! SurrealDB article store
//!
//! Supports runtime protocol selection via URL scheme:
//! - `ws://` / `wss://` - WebSocket connections
//! - `http://` / `https://` - HTTP connections
//! - `mem://` - In-memory database (for testing)
//!
//! Articles live in one table keyed by their UUID string. Timestamps are
//! stored as RFC3339 strings.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::error::{StoreError, StoreErrorKind, StoreOperation};
use super::filter::{ArticleFilter, FilterOperator, FilterValue};
use super::model::{Article, ArticleId};
use super::pagination::Pagination;
use super::store::{ArticleStore, StoreResult};
use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

/// SurrealDB client type alias using the `Any` engine for runtime protocol selection
pub type SurrealClient = surrealdb::Surreal<surrealdb::engine::any::Any>;

const SELECT_FIELDS: &str = "record::id(id) AS id, title, content, author, tags, \
    publishedDate, isPublished, createdAt, updatedAt";

/// Connect to SurrealDB, retrying with exponential backoff
pub async fn create_client(config: &DatabaseConfig) -> Result<SurrealClient> {
    let mut attempt = 0;
    let base_delay = Duration::from_secs(config.retry_delay_secs);

    loop {
        match try_create_client(config).await {
            Ok(client) => {
                tracing::info!(
                    url = %sanitize_connection_url(&config.url),
                    namespace = %config.namespace,
                    database = %config.database,
                    attempts = attempt + 1,
                    "SurrealDB connected"
                );
                return Ok(client);
            }
            Err(e) => {
                attempt += 1;

                if attempt > config.max_retries {
                    tracing::error!(
                        "Failed to connect to SurrealDB after {} attempts: {}",
                        config.max_retries + 1,
                        e
                    );
                    return Err(e);
                }

                let delay = base_delay * 2_u32.pow(attempt.saturating_sub(1).min(16));
                tracing::warn!(
                    "SurrealDB connection attempt {} failed: {}. Retrying in {:?}...",
                    attempt,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

async fn try_create_client(config: &DatabaseConfig) -> Result<SurrealClient> {
    let url_safe = sanitize_connection_url(&config.url);
    tracing::debug!("Connecting to SurrealDB: {}", url_safe);

    let client = surrealdb::engine::any::connect(&config.url)
        .await
        .map_err(|e| Error::Database(format!("Failed to connect to '{}': {}", url_safe, e)))?;

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        client
            .signin(surrealdb::opt::auth::Root {
                username,
                password,
            })
            .await
            .map_err(|e| {
                Error::Database(format!("Failed to authenticate at '{}': {}", url_safe, e))
            })?;
    }

    client
        .use_ns(&config.namespace)
        .use_db(&config.database)
        .await
        .map_err(|e| {
            Error::Database(format!(
                "Failed to select namespace '{}' / database '{}': {}",
                config.namespace, config.database, e
            ))
        })?;

    Ok(client)
}

/// Mask credentials embedded in a connection URL
fn sanitize_connection_url(url: &str) -> String {
    if let (Some(at_pos), Some(scheme_end)) = (url.find('@'), url.find("://")) {
        let scheme = &url[..scheme_end + 3];
        let after_at = &url[at_pos..];
        return format!("{}***{}", scheme, after_at);
    }
    url.to_string()
}

fn classify(err: &surrealdb::Error) -> StoreErrorKind {
    let text = err.to_string().to_lowercase();
    if text.contains("connect") || text.contains("refused") || text.contains("network") {
        StoreErrorKind::ConnectionFailed
    } else if text.contains("timeout") || text.contains("timed out") {
        StoreErrorKind::Timeout
    } else if text.contains("deserializ") || text.contains("serializ") {
        StoreErrorKind::SerializationError
    } else {
        StoreErrorKind::DatabaseError
    }
}

fn store_error(operation: StoreOperation, err: surrealdb::Error) -> StoreError {
    StoreError::new(operation, classify(&err), err.to_string())
}

/// Document body written to the table; the key lives in the record id
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArticleDocument {
    title: String,
    content: String,
    author: String,
    tags: Vec<String>,
    published_date: String,
    is_published: bool,
    created_at: String,
    updated_at: String,
}

impl From<&Article> for ArticleDocument {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            content: article.content.clone(),
            author: article.author.clone(),
            tags: article.tags.clone(),
            published_date: article.published_date.to_rfc3339(),
            is_published: article.is_published,
            created_at: article.created_at.to_rfc3339(),
            updated_at: article.updated_at.to_rfc3339(),
        }
    }
}

/// Projected row returned by article selects
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleRow {
    id: String,
    title: String,
    content: String,
    author: String,
    #[serde(default)]
    tags: Vec<String>,
    published_date: String,
    is_published: bool,
    created_at: String,
    updated_at: String,
}

impl ArticleRow {
    fn into_article(self, operation: StoreOperation) -> StoreResult<Article> {
        let parse_time = |raw: &str| {
            DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    StoreError::serialization(operation, format!("Invalid timestamp '{}': {}", raw, e))
                        .with_entity_id(self.id.clone())
                })
        };

        Ok(Article {
            id: self.id.parse().map_err(|e| {
                StoreError::serialization(operation, format!("Invalid article id: {}", e))
                    .with_entity_id(self.id.clone())
            })?,
            published_date: parse_time(&self.published_date)?,
            created_at: parse_time(&self.created_at)?,
            updated_at: parse_time(&self.updated_at)?,
            title: self.title,
            content: self.content,
            author: self.author,
            tags: self.tags,
            is_published: self.is_published,
        })
    }
}

/// Only the record id of a written or deleted row
#[derive(Debug, Deserialize)]
struct RecordRef {
    #[allow(dead_code)]
    id: RecordId,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

/// Parameterised `WHERE` clause plus its bindings
#[derive(Debug, PartialEq)]
struct WhereClause {
    sql: String,
    bindings: Vec<(String, FilterValue)>,
}

fn render_filter(filter: &ArticleFilter) -> WhereClause {
    let mut parts = Vec::with_capacity(filter.conditions().len());
    let mut bindings = Vec::with_capacity(filter.conditions().len());

    for (index, condition) in filter.conditions().iter().enumerate() {
        let param = format!("f{}", index);
        let op = match condition.operator {
            FilterOperator::Equal => "=",
            FilterOperator::ContainsAny => "CONTAINSANY",
        };
        parts.push(format!("{} {} ${}", condition.field, op, param));
        bindings.push((param, condition.value.clone()));
    }

    let sql = if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    };
    WhereClause { sql, bindings }
}

fn bind_filter<'r>(
    mut query: surrealdb::method::Query<'r, surrealdb::engine::any::Any>,
    bindings: Vec<(String, FilterValue)>,
) -> surrealdb::method::Query<'r, surrealdb::engine::any::Any> {
    for (name, value) in bindings {
        query = match value {
            FilterValue::String(s) => query.bind((name, s)),
            FilterValue::Boolean(b) => query.bind((name, b)),
            FilterValue::StringList(list) => query.bind((name, list)),
        };
    }
    query
}

/// Article store over a SurrealDB table
#[derive(Clone)]
pub struct SurrealArticleStore {
    client: Arc<SurrealClient>,
    table: String,
}

impl SurrealArticleStore {
    pub fn new(client: Arc<SurrealClient>, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// Connect using `config` and wrap the client
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let client = create_client(config).await?;
        Ok(Self::new(Arc::new(client), config.table.clone()))
    }
}

impl ArticleStore for SurrealArticleStore {
    async fn find_by_id(&self, id: &ArticleId) -> StoreResult<Option<Article>> {
        let op = StoreOperation::FindById;
        let sql = format!("SELECT {} FROM type::thing($table, $id)", SELECT_FIELDS);
        let mut response = self
            .client
            .query(sql)
            .bind(("table", self.table.clone()))
            .bind(("id", id.to_string()))
            .await
            .map_err(|e| store_error(op, e))?;

        let rows: Vec<ArticleRow> = response.take(0).map_err(|e| store_error(op, e))?;
        rows.into_iter().next().map(|row| row.into_article(op)).transpose()
    }

    async fn find(&self, filter: &ArticleFilter, pagination: Pagination) -> StoreResult<Vec<Article>> {
        let op = StoreOperation::Find;
        let clause = render_filter(filter);
        let sql = format!(
            "SELECT {} FROM type::table($table){} ORDER BY id DESC LIMIT $limit START $start",
            SELECT_FIELDS, clause.sql
        );

        let query = self
            .client
            .query(sql)
            .bind(("table", self.table.clone()))
            .bind(("limit", i64::try_from(pagination.limit).unwrap_or(i64::MAX)))
            .bind(("start", i64::try_from(pagination.offset).unwrap_or(i64::MAX)));
        let mut response = bind_filter(query, clause.bindings)
            .await
            .map_err(|e| store_error(op, e))?;

        let rows: Vec<ArticleRow> = response.take(0).map_err(|e| store_error(op, e))?;
        rows.into_iter().map(|row| row.into_article(op)).collect()
    }

    async fn count(&self, filter: &ArticleFilter) -> StoreResult<u64> {
        let op = StoreOperation::Count;
        let clause = render_filter(filter);
        let sql = format!(
            "SELECT count() AS total FROM type::table($table){} GROUP ALL",
            clause.sql
        );

        let query = self
            .client
            .query(sql)
            .bind(("table", self.table.clone()));
        let mut response = bind_filter(query, clause.bindings)
            .await
            .map_err(|e| store_error(op, e))?;

        let row: Option<CountRow> = response.take(0).map_err(|e| store_error(op, e))?;
        Ok(row.map_or(0, |r| r.total))
    }

    async fn insert(&self, article: Article) -> StoreResult<Article> {
        let op = StoreOperation::Insert;
        self.client
            .query("CREATE type::thing($table, $id) CONTENT $doc")
            .bind(("table", self.table.clone()))
            .bind(("id", article.id.to_string()))
            .bind(("doc", ArticleDocument::from(&article)))
            .await
            .and_then(|response| response.check())
            .map_err(|e| store_error(op, e).with_entity_id(article.id.to_string()))?;
        Ok(article)
    }

    async fn replace(&self, article: Article) -> StoreResult<Article> {
        let op = StoreOperation::Replace;
        let mut response = self
            .client
            .query("UPDATE type::thing($table, $id) CONTENT $doc RETURN AFTER")
            .bind(("table", self.table.clone()))
            .bind(("id", article.id.to_string()))
            .bind(("doc", ArticleDocument::from(&article)))
            .await
            .map_err(|e| store_error(op, e))?;

        let updated: Vec<RecordRef> = response.take(0).map_err(|e| store_error(op, e))?;
        if updated.is_empty() {
            return Err(StoreError::not_found(op, article.id.to_string()));
        }
        Ok(article)
    }

    async fn delete(&self, id: &ArticleId) -> StoreResult<bool> {
        let op = StoreOperation::Delete;
        let mut response = self
            .client
            .query("DELETE type::thing($table, $id) RETURN BEFORE")
            .bind(("table", self.table.clone()))
            .bind(("id", id.to_string()))
            .await
            .map_err(|e| store_error(op, e))?;

        let deleted: Vec<RecordRef> = response.take(0).map_err(|e| store_error(op, e))?;
        Ok(!deleted.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::articles::{ArticleListQuery, CreateArticleRequest, FilterCondition};

    fn mem_config() -> DatabaseConfig {
        DatabaseConfig {
            url: "mem://".to_string(),
            namespace: "test".to_string(),
            database: "test".to_string(),
            table: "article".to_string(),
            username: None,
            password: None,
            max_retries: 0,
            retry_delay_secs: 1,
        }
    }

    fn article(title: &str, tags: &[&str], published: bool) -> Article {
        Article::new(
            CreateArticleRequest {
                title: title.to_string(),
                content: "Content that is long enough".to_string(),
                author: "surreal".to_string(),
                tags: tags.iter().map(|t| (*t).to_string()).collect(),
                is_published: Some(published),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_sanitize_connection_url_no_credentials() {
        let url = "ws://localhost:8000";
        assert_eq!(sanitize_connection_url(url), url);
    }

    #[test]
    fn test_sanitize_connection_url_with_credentials() {
        let sanitized = sanitize_connection_url("ws://user:pass@localhost:8000");
        assert_eq!(sanitized, "ws://***@localhost:8000");
    }

    #[test]
    fn test_render_baseline_filter() {
        let clause = render_filter(&ArticleFilter::published());
        assert_eq!(clause.sql, " WHERE isPublished = $f0");
        assert_eq!(clause.bindings, vec![("f0".to_string(), FilterValue::Boolean(true))]);
    }

    #[test]
    fn test_render_full_filter() {
        let query = ArticleListQuery {
            tags: vec!["a".to_string()],
            author: Some("b".to_string()),
            ..ArticleListQuery::default()
        };
        let clause = render_filter(&ArticleFilter::from_query(&query));
        assert_eq!(
            clause.sql,
            " WHERE isPublished = $f0 AND tags CONTAINSANY $f1 AND author = $f2"
        );
        assert_eq!(clause.bindings.len(), 3);
        assert_eq!(
            FilterCondition::eq("author", "b").value,
            clause.bindings[2].1
        );
    }

    #[tokio::test]
    async fn test_mem_connection() {
        let result = create_client(&mem_config()).await;
        assert!(result.is_ok(), "Failed to connect to in-memory SurrealDB: {:?}", result.err());
    }

    #[tokio::test]
    async fn test_crud_roundtrip() {
        let store = SurrealArticleStore::connect(&mem_config()).await.unwrap();
        let created = store.insert(article("first", &["rust"], true)).await.unwrap();

        let found = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.title, "first");
        assert_eq!(found.tags, vec!["rust"]);
        assert_eq!(found.created_at.timestamp_micros(), created.created_at.timestamp_micros());

        let mut changed = found.clone();
        changed.title = "renamed".to_string();
        store.replace(changed).await.unwrap();
        let found = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.title, "renamed");

        assert!(store.delete(&created.id).await.unwrap());
        assert!(!store.delete(&created.id).await.unwrap());
        assert!(store.find_by_id(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_missing_is_not_found() {
        let store = SurrealArticleStore::connect(&mem_config()).await.unwrap();
        let err = store.replace(article("ghost", &[], true)).await.unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_find_and_count_with_filter() {
        let store = SurrealArticleStore::connect(&mem_config()).await.unwrap();
        for i in 0..5 {
            store
                .insert(article(&format!("rust {i}"), &["rust"], true))
                .await
                .unwrap();
        }
        store.insert(article("go", &["go"], true)).await.unwrap();
        store.insert(article("draft", &["rust"], false)).await.unwrap();

        let query = ArticleListQuery {
            tags: vec!["rust".to_string(), "zig".to_string()],
            ..ArticleListQuery::default()
        };
        let filter = ArticleFilter::from_query(&query);
        assert_eq!(store.count(&filter).await.unwrap(), 5);
        assert_eq!(store.count(&ArticleFilter::published()).await.unwrap(), 6);

        let first = store.find(&filter, Pagination::page(1, 2)).await.unwrap();
        let second = store.find(&filter, Pagination::page(2, 2)).await.unwrap();
        let third = store.find(&filter, Pagination::page(3, 2)).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_eq!(third.len(), 1);
        assert_eq!(first[0].title, "rust 4");
        assert!(first[0].id > first[1].id);
        assert!(first[1].id > second[0].id);

        let beyond = store.find(&filter, Pagination::page(9, 2)).await.unwrap();
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_count_empty_table() {
        let store = SurrealArticleStore::connect(&mem_config()).await.unwrap();
        assert_eq!(store.count(&ArticleFilter::published()).await.unwrap(), 0);
    }
}
