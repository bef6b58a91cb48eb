//! Articles: model, listing pipeline, storage and HTTP handlers
//!
//! A listing request flows through the modules in this order:
//!
//! 1. [`ArticleListQuery`] normalises the raw query string
//! 2. [`ArticleFilter`] turns it into store-agnostic conditions
//! 3. an [`ArticleStore`] counts and fetches one page
//! 4. [`PaginationInfo`] and [`ListResponse`] shape the reply
//!
//! [`ArticleService`] drives these steps and the single-article operations.

mod error;
mod filter;
mod handlers;
mod memory;
mod model;
mod pagination;
mod query;
mod response;
mod service;
mod store;
#[cfg(feature = "surrealdb")]
mod surreal;

pub use error::{
    ApiError, ApiErrorKind, ApiOperation, StoreError, StoreErrorKind, StoreOperation,
};
pub use filter::{
    ArticleFilter, FilterCondition, FilterOperator, FilterValue, FIELD_AUTHOR,
    FIELD_IS_PUBLISHED, FIELD_TAGS,
};
pub use handlers::{
    create_article, delete_article, get_article, list_articles, routes, update_article,
};
pub use memory::MemoryArticleStore;
pub use model::{
    Article, ArticleId, CreateArticleRequest, Patch, UpdateArticleRequest, CONTENT_MIN_LEN,
    TITLE_MAX_LEN,
};
pub use pagination::{Pagination, PaginationInfo};
pub use query::{ArticleListQuery, QueryLimits, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use response::{ApiResponse, ErrorResponse, ListResponse};
pub use service::{ArticleService, DEFAULT_QUERY_TIMEOUT};
pub use store::{ArticleStore, StoreResult};
#[cfg(feature = "surrealdb")]
pub use surreal::{create_client, SurrealArticleStore, SurrealClient};
