//! Query parameter parsing for article listings
//!
//! Raw query strings are normalised into an [`ArticleListQuery`]. Parsing
//! never fails: malformed or out-of-range values fall back to defaults.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use article_service::articles::ArticleListQuery;
//!
//! let params = HashMap::from([
//!     ("tags".to_string(), "  rust , axum,,".to_string()),
//!     ("limit".to_string(), "500".to_string()),
//!     ("page".to_string(), "-3".to_string()),
//! ]);
//!
//! let query = ArticleListQuery::from_params(&params);
//! assert_eq!(query.tags, vec!["rust", "axum"]);
//! assert_eq!(query.limit, 100);
//! assert_eq!(query.page, 1);
//! assert_eq!(query.pagination().offset, 0);
//! ```

use std::collections::HashMap;
use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts, Query};
use http::request::Parts;

use super::pagination::Pagination;

/// Default number of articles per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum allowed articles per page
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size bounds applied while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl QueryLimits {
    /// Create limits, keeping both values at least 1 and the default within the maximum
    #[must_use]
    pub fn new(default_page_size: u32, max_page_size: u32) -> Self {
        let max_page_size = max_page_size.max(1);
        Self {
            default_page_size: default_page_size.clamp(1, max_page_size),
            max_page_size,
        }
    }
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }
}

/// Validated listing query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleListQuery {
    /// Requested tags, trimmed, empty segments removed
    pub tags: Vec<String>,
    /// Exact author match
    pub author: Option<String>,
    /// 1-indexed page number
    pub page: u32,
    /// Page size
    pub limit: u32,
}

impl Default for ArticleListQuery {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            author: None,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ArticleListQuery {
    /// Parse raw query parameters with the default limits
    #[must_use]
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self::from_params_with(params, QueryLimits::default())
    }

    /// Parse raw query parameters with explicit page size limits
    #[must_use]
    pub fn from_params_with(params: &HashMap<String, String>, limits: QueryLimits) -> Self {
        let tags = params
            .get("tags")
            .map(|raw| parse_tags(raw))
            .unwrap_or_default();

        let author = params
            .get("author")
            .filter(|author| !author.is_empty())
            .cloned();

        let limit = params
            .get("limit")
            .and_then(|raw| parse_positive(raw))
            .unwrap_or(limits.default_page_size)
            .min(limits.max_page_size);

        let page = params
            .get("page")
            .and_then(|raw| parse_positive(raw))
            .unwrap_or(1);

        Self {
            tags,
            author,
            page,
            limit,
        }
    }

    /// Skip/limit bounds for the store
    #[must_use]
    pub fn pagination(&self) -> Pagination {
        Pagination::page(self.page, self.limit)
    }
}

/// Split a comma-separated tag list, trimming and dropping empty segments
fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Base-10 integer strictly greater than zero
///
/// Values beyond `u32::MAX` saturate; the caller clamps further.
fn parse_positive(raw: &str) -> Option<u32> {
    match raw.parse::<i64>() {
        Ok(value) if value > 0 => Some(u32::try_from(value).unwrap_or(u32::MAX)),
        _ => None,
    }
}

impl<S> FromRequestParts<S> for ArticleListQuery
where
    QueryLimits: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let limits = QueryLimits::from_ref(state);
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();
        Ok(Self::from_params_with(&first_values(pairs), limits))
    }
}

/// Collapse decoded pairs, keeping the first value of a repeated key
fn first_values(pairs: Vec<(String, String)>) -> HashMap<String, String> {
    let mut params = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        params.entry(key).or_insert(value);
    }
    params
}
