//! Article use cases over an [`ArticleStore`]
//!
//! Each operation gets one deadline, `query_timeout` from its start, shared by
//! all of its store calls. When it passes, the pending store future is dropped
//! and a [`StoreErrorKind::Timeout`](super::StoreErrorKind::Timeout) error is
//! returned.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;

use super::error::{ApiError, ApiOperation, StoreError, StoreOperation};
use super::filter::ArticleFilter;
use super::model::{Article, ArticleId, CreateArticleRequest, UpdateArticleRequest};
use super::pagination::PaginationInfo;
use super::query::ArticleListQuery;
use super::response::ListResponse;
use super::store::{ArticleStore, StoreResult};

/// Default store deadline per operation
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Orchestrates parsing results, store calls and envelope shaping
pub struct ArticleService<S> {
    store: S,
    query_timeout: Duration,
}

impl<S: ArticleStore> ArticleService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    fn deadline(&self) -> Instant {
        Instant::now() + self.query_timeout
    }

    async fn bounded<T>(
        &self,
        deadline: Instant,
        operation: StoreOperation,
        call: impl Future<Output = StoreResult<T>>,
    ) -> StoreResult<T> {
        match tokio::time::timeout_at(deadline, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::timeout(
                operation,
                format!("Operation exceeded {:?}", self.query_timeout),
            )),
        }
    }

    /// One page of published articles plus pagination metadata
    ///
    /// A page past the end yields an empty list, not an error.
    pub async fn list(&self, query: &ArticleListQuery) -> Result<ListResponse<Article>, ApiError> {
        let deadline = self.deadline();
        let filter = ArticleFilter::from_query(query);

        let total = self
            .bounded(deadline, StoreOperation::Count, self.store.count(&filter))
            .await?;
        let articles = self
            .bounded(
                deadline,
                StoreOperation::Find,
                self.store.find(&filter, query.pagination()),
            )
            .await?;

        tracing::debug!(
            page = query.page,
            limit = query.limit,
            tags = ?query.tags,
            author = ?query.author,
            total,
            returned = articles.len(),
            "Listed articles"
        );

        Ok(ListResponse::new(
            articles,
            PaginationInfo::new(query.page, query.limit, total),
        ))
    }

    /// Fetch one article by its raw path identifier
    pub async fn get(&self, raw_id: &str) -> Result<Article, ApiError> {
        let id = parse_id(ApiOperation::Get, raw_id)?;
        self.bounded(self.deadline(), StoreOperation::FindById, self.store.find_by_id(&id))
            .await?
            .ok_or_else(|| ApiError::not_found(ApiOperation::Get, raw_id))
    }

    pub async fn create(&self, request: CreateArticleRequest) -> Result<Article, ApiError> {
        request
            .validate()
            .map_err(|msg| ApiError::validation(ApiOperation::Create, msg))?;

        let article = Article::new(request, Utc::now());
        let article = self
            .bounded(self.deadline(), StoreOperation::Insert, self.store.insert(article))
            .await?;

        tracing::info!(article_id = %article.id, author = %article.author, "Article created");
        Ok(article)
    }

    /// Apply a partial update
    ///
    /// Unknown ids are reported before validation so a bad id always yields 404.
    pub async fn update(
        &self,
        raw_id: &str,
        request: UpdateArticleRequest,
    ) -> Result<Article, ApiError> {
        let deadline = self.deadline();
        let id = parse_id(ApiOperation::Update, raw_id)?;
        let current = self
            .bounded(deadline, StoreOperation::FindById, self.store.find_by_id(&id))
            .await
            .map_err(|e| ApiError::from(e).during(ApiOperation::Update))?
            .ok_or_else(|| ApiError::not_found(ApiOperation::Update, raw_id))?;

        request
            .validate()
            .map_err(|msg| ApiError::validation(ApiOperation::Update, msg))?;

        let updated = request.apply(current, Utc::now());
        let updated = self
            .bounded(deadline, StoreOperation::Replace, self.store.replace(updated))
            .await?;

        tracing::info!(article_id = %updated.id, "Article updated");
        Ok(updated)
    }

    pub async fn delete(&self, raw_id: &str) -> Result<(), ApiError> {
        let id = parse_id(ApiOperation::Delete, raw_id)?;
        let removed = self
            .bounded(self.deadline(), StoreOperation::Delete, self.store.delete(&id))
            .await?;
        if !removed {
            return Err(ApiError::not_found(ApiOperation::Delete, raw_id));
        }

        tracing::info!(article_id = %id, "Article deleted");
        Ok(())
    }
}

/// Malformed identifiers are reported as not found
fn parse_id(operation: ApiOperation, raw_id: &str) -> Result<ArticleId, ApiError> {
    raw_id
        .parse()
        .map_err(|_| ApiError::not_found(operation, raw_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::articles::{
        ApiErrorKind, MemoryArticleStore, Pagination, Patch, StoreErrorKind,
    };
    use std::collections::HashMap;

    fn request(title: &str, tags: &[&str]) -> CreateArticleRequest {
        CreateArticleRequest {
            title: title.to_string(),
            content: "Enough content to pass validation".to_string(),
            author: "writer".to_string(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            is_published: None,
        }
    }

    fn service() -> ArticleService<MemoryArticleStore> {
        ArticleService::new(MemoryArticleStore::new())
    }

    /// Store whose calls never complete
    struct StalledStore;

    impl ArticleStore for StalledStore {
        async fn find_by_id(&self, _id: &ArticleId) -> StoreResult<Option<Article>> {
            std::future::pending().await
        }
        async fn find(&self, _f: &ArticleFilter, _p: Pagination) -> StoreResult<Vec<Article>> {
            std::future::pending().await
        }
        async fn count(&self, _f: &ArticleFilter) -> StoreResult<u64> {
            std::future::pending().await
        }
        async fn insert(&self, _a: Article) -> StoreResult<Article> {
            std::future::pending().await
        }
        async fn replace(&self, _a: Article) -> StoreResult<Article> {
            std::future::pending().await
        }
        async fn delete(&self, _id: &ArticleId) -> StoreResult<bool> {
            std::future::pending().await
        }
    }

    /// Store where each listing call takes `delay` before answering
    struct SlowStore {
        delay: Duration,
    }

    impl ArticleStore for SlowStore {
        async fn find_by_id(&self, _id: &ArticleId) -> StoreResult<Option<Article>> {
            tokio::time::sleep(self.delay).await;
            Ok(None)
        }
        async fn find(&self, _f: &ArticleFilter, _p: Pagination) -> StoreResult<Vec<Article>> {
            tokio::time::sleep(self.delay).await;
            Ok(Vec::new())
        }
        async fn count(&self, _f: &ArticleFilter) -> StoreResult<u64> {
            tokio::time::sleep(self.delay).await;
            Ok(0)
        }
        async fn insert(&self, a: Article) -> StoreResult<Article> {
            Ok(a)
        }
        async fn replace(&self, a: Article) -> StoreResult<Article> {
            Ok(a)
        }
        async fn delete(&self, _id: &ArticleId) -> StoreResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_list_pagination_scenario() {
        let service = service();
        for i in 0..25 {
            service.create(request(&format!("post {i}"), &[])).await.unwrap();
        }

        let params = HashMap::from([
            ("limit".to_string(), "10".to_string()),
            ("page".to_string(), "3".to_string()),
        ]);
        let page = service
            .list(&ArticleListQuery::from_params(&params))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 5);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.total_articles, 25);
        assert!(!page.pagination.has_next_page);
        assert!(page.pagination.has_prev_page);
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let page = service().list(&ArticleListQuery::default()).await.unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
        assert!(!page.pagination.has_next_page);
        assert!(!page.pagination.has_prev_page);
    }

    #[tokio::test]
    async fn test_list_hides_drafts() {
        let service = service();
        service.create(request("visible", &[])).await.unwrap();
        let mut draft = request("hidden", &[]);
        draft.is_published = Some(false);
        let draft = service.create(draft).await.unwrap();

        let page = service.list(&ArticleListQuery::default()).await.unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].title, "visible");

        // Drafts are still addressable directly
        assert_eq!(service.get(&draft.id.to_string()).await.unwrap().title, "hidden");
    }

    #[tokio::test]
    async fn test_create_validation_error() {
        let err = service().create(request("", &[])).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::ValidationFailed);
        assert_eq!(err.message, "Title is required");
    }

    #[tokio::test]
    async fn test_get_malformed_and_unknown_ids() {
        let service = service();
        let err = service.get("not-a-uuid").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);

        let err = service.get(&ArticleId::new().to_string()).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_flow() {
        let service = service();
        let created = service.create(request("old", &["a"])).await.unwrap();

        let update = UpdateArticleRequest {
            title: Patch::Value("new".to_string()),
            tags: Patch::Null,
            ..UpdateArticleRequest::default()
        };
        let updated = service
            .update(&created.id.to_string(), update)
            .await
            .unwrap();
        assert_eq!(updated.title, "new");
        assert!(updated.tags.is_empty());
        assert_eq!(updated.content, created.content);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn test_update_errors() {
        let service = service();
        let created = service.create(request("old", &[])).await.unwrap();

        let err = service
            .update(&created.id.to_string(), UpdateArticleRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::ValidationFailed);
        assert_eq!(err.message, "No updates provided");

        let err = service
            .update(&ArticleId::new().to_string(), UpdateArticleRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
        assert_eq!(err.operation, ApiOperation::Update);
    }

    #[tokio::test]
    async fn test_delete_flow() {
        let service = service();
        let created = service.create(request("bye", &[])).await.unwrap();
        let id = created.id.to_string();

        service.delete(&id).await.unwrap();
        assert_eq!(service.delete(&id).await.unwrap_err().kind, ApiErrorKind::NotFound);
        assert_eq!(service.get(&id).await.unwrap_err().kind, ApiErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_store_timeout_maps_to_unavailable() {
        let service =
            ArticleService::new(StalledStore).with_query_timeout(Duration::from_millis(50));
        let err = service.list(&ArticleListQuery::default()).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::ServiceUnavailable);
        assert!(err.detail.unwrap().contains(&StoreErrorKind::Timeout.to_string()));
    }

    #[tokio::test]
    async fn test_list_shares_one_deadline() {
        let service = ArticleService::new(SlowStore {
            delay: Duration::from_millis(70),
        })
        .with_query_timeout(Duration::from_millis(100));

        // Each call alone fits the budget; together they do not
        let err = service.list(&ArticleListQuery::default()).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::ServiceUnavailable);
        assert_eq!(err.operation, ApiOperation::List);
    }

    #[tokio::test]
    async fn test_list_within_deadline() {
        let service = ArticleService::new(SlowStore {
            delay: Duration::from_millis(5),
        })
        .with_query_timeout(Duration::from_secs(2));

        let page = service.list(&ArticleListQuery::default()).await.unwrap();
        assert!(page.data.is_empty());
    }
}
