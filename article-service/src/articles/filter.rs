//! Backend-agnostic filter predicates for article listings
//!
//! An [`ArticleFilter`] is a conjunction of [`FilterCondition`]s. It always
//! contains the published baseline; tag and author conditions are added from
//! the listing query.
//!
//! # Example
//!
//! ```rust
//! use article_service::articles::{ArticleFilter, ArticleListQuery, FilterCondition};
//!
//! let filter = ArticleFilter::from_query(&ArticleListQuery::default());
//! assert_eq!(filter.conditions(), &[FilterCondition::eq("isPublished", true)]);
//! ```

use std::fmt;

use super::model::Article;
use super::query::ArticleListQuery;

/// Field holding the publication flag
pub const FIELD_IS_PUBLISHED: &str = "isPublished";

/// Field holding the tag list
pub const FIELD_TAGS: &str = "tags";

/// Field holding the author name
pub const FIELD_AUTHOR: &str = "author";

/// Comparison operators for filter conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Field equals value
    Equal,
    /// List field shares at least one element with the value list
    ContainsAny,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::ContainsAny => write!(f, "CONTAINSANY"),
        }
    }
}

/// A value that can be used in filter conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    String(String),
    Boolean(bool),
    StringList(Vec<String>),
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(list: Vec<String>) -> Self {
        Self::StringList(list)
    }
}

/// A single filter condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    /// The field name to filter on
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: FilterValue,
}

impl FilterCondition {
    /// Create an equality filter (field = value)
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::Equal,
            value: value.into(),
        }
    }

    /// Create a set-intersection filter over a list field
    pub fn contains_any(field: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::ContainsAny,
            value: FilterValue::StringList(values),
        }
    }

    /// Evaluate this condition against an article
    ///
    /// Unknown fields and mismatched value types never match.
    #[must_use]
    pub fn matches(&self, article: &Article) -> bool {
        match (self.field.as_str(), self.operator, &self.value) {
            (FIELD_IS_PUBLISHED, FilterOperator::Equal, FilterValue::Boolean(expected)) => {
                article.is_published == *expected
            }
            (FIELD_AUTHOR, FilterOperator::Equal, FilterValue::String(expected)) => {
                article.author == *expected
            }
            (FIELD_TAGS, FilterOperator::ContainsAny, FilterValue::StringList(wanted)) => {
                article.tags.iter().any(|tag| wanted.contains(tag))
            }
            _ => false,
        }
    }
}

/// Conjunction of filter conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleFilter {
    conditions: Vec<FilterCondition>,
}

impl ArticleFilter {
    /// Published articles only
    #[must_use]
    pub fn published() -> Self {
        Self {
            conditions: vec![FilterCondition::eq(FIELD_IS_PUBLISHED, true)],
        }
    }

    /// Build the filter for a listing query
    #[must_use]
    pub fn from_query(query: &ArticleListQuery) -> Self {
        let mut filter = Self::published();
        if !query.tags.is_empty() {
            filter
                .conditions
                .push(FilterCondition::contains_any(FIELD_TAGS, query.tags.clone()));
        }
        if let Some(author) = &query.author {
            filter
                .conditions
                .push(FilterCondition::eq(FIELD_AUTHOR, author.as_str()));
        }
        filter
    }

    /// The conditions, baseline first
    #[must_use]
    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    /// Whether every condition holds for `article`
    #[must_use]
    pub fn matches(&self, article: &Article) -> bool {
        self.conditions.iter().all(|c| c.matches(article))
    }
}

impl Default for ArticleFilter {
    fn default() -> Self {
        Self::published()
    }
}
