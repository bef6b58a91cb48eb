//! In-process article store

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use super::error::{StoreError, StoreOperation};
use super::filter::ArticleFilter;
use super::model::{Article, ArticleId};
use super::pagination::Pagination;
use super::store::{ArticleStore, StoreResult};

/// Article store backed by an ordered map
///
/// Keys are UUIDv7 identifiers, so reverse iteration yields newest first.
#[derive(Debug, Default)]
pub struct MemoryArticleStore {
    articles: RwLock<BTreeMap<ArticleId, Article>>,
}

impl MemoryArticleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored articles, published or not
    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.articles.read().await.is_empty()
    }
}

impl ArticleStore for MemoryArticleStore {
    async fn find_by_id(&self, id: &ArticleId) -> StoreResult<Option<Article>> {
        Ok(self.articles.read().await.get(id).cloned())
    }

    async fn find(&self, filter: &ArticleFilter, pagination: Pagination) -> StoreResult<Vec<Article>> {
        let skip = usize::try_from(pagination.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(pagination.limit).unwrap_or(usize::MAX);

        let articles = self.articles.read().await;
        Ok(articles
            .values()
            .rev()
            .filter(|article| filter.matches(article))
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &ArticleFilter) -> StoreResult<u64> {
        let articles = self.articles.read().await;
        let total = articles.values().filter(|article| filter.matches(article)).count();
        Ok(total as u64)
    }

    async fn insert(&self, article: Article) -> StoreResult<Article> {
        let mut articles = self.articles.write().await;
        if articles.contains_key(&article.id) {
            return Err(StoreError::database(
                StoreOperation::Insert,
                "Article identifier already in use",
            )
            .with_entity_id(article.id.to_string()));
        }
        articles.insert(article.id, article.clone());
        Ok(article)
    }

    async fn replace(&self, article: Article) -> StoreResult<Article> {
        let mut articles = self.articles.write().await;
        match articles.get_mut(&article.id) {
            Some(stored) => {
                *stored = article.clone();
                Ok(article)
            }
            None => Err(StoreError::not_found(
                StoreOperation::Replace,
                article.id.to_string(),
            )),
        }
    }

    async fn delete(&self, id: &ArticleId) -> StoreResult<bool> {
        Ok(self.articles.write().await.remove(id).is_some())
    }
}
