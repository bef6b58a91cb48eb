//! Storage abstraction for articles
//!
//! Async methods use return-position `impl Future` so implementations can be
//! plain `async fn`s without boxing.

use std::future::Future;

use super::error::StoreError;
use super::filter::ArticleFilter;
use super::model::{Article, ArticleId};
use super::pagination::Pagination;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence for articles
///
/// `find` returns matches ordered by identifier descending, so pages taken
/// with successive offsets never overlap while the data is unchanged.
pub trait ArticleStore: Send + Sync + 'static {
    /// Find an article by identifier, regardless of publication state
    fn find_by_id(&self, id: &ArticleId) -> impl Future<Output = StoreResult<Option<Article>>> + Send;

    /// Find one page of articles matching `filter`
    fn find(
        &self,
        filter: &ArticleFilter,
        pagination: Pagination,
    ) -> impl Future<Output = StoreResult<Vec<Article>>> + Send;

    /// Count all articles matching `filter`
    fn count(&self, filter: &ArticleFilter) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Persist a new article
    fn insert(&self, article: Article) -> impl Future<Output = StoreResult<Article>> + Send;

    /// Overwrite an existing article
    ///
    /// Fails with [`StoreErrorKind::NotFound`](super::StoreErrorKind::NotFound)
    /// when no article has the same identifier.
    fn replace(&self, article: Article) -> impl Future<Output = StoreResult<Article>> + Send;

    /// Hard delete; returns whether an article was removed
    fn delete(&self, id: &ArticleId) -> impl Future<Output = StoreResult<bool>> + Send;
}
