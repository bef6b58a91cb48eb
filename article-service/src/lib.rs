//! # article-service
//!
//! REST service for blog articles stored in a document database.
//!
//! ## Features
//!
//! - **Listing pipeline**: lenient query parsing, tag/author filtering over published
//!   articles, deterministic newest-first pagination with page metadata
//! - **CRUD**: create, fetch, partial update and delete by identifier
//! - **Storage**: SurrealDB (feature `surrealdb`) or an in-process store
//! - **Middleware stack**: request tracing, request IDs, CORS, timeouts, body size limits,
//!   panic recovery
//! - **Graceful shutdown**: SIGTERM and SIGINT drain in-flight requests
//!
//! ## Example
//!
//! ```rust,no_run
//! use article_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::new(config.clone(), MemoryArticleStore::new());
//!     let app = build_router(state);
//!
//!     Server::new(config).serve(app).await?;
//!     Ok(())
//! }
//! ```

pub mod articles;
pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod observability;
pub mod server;
pub mod state;

/// Commonly used types
pub mod prelude {
    pub use crate::articles::{
        ApiError, ApiResponse, Article, ArticleFilter, ArticleId, ArticleListQuery,
        ArticleService, ArticleStore, CreateArticleRequest, ListResponse, MemoryArticleStore,
        Pagination, PaginationInfo, Patch, UpdateArticleRequest,
    };
    #[cfg(feature = "surrealdb")]
    pub use crate::articles::SurrealArticleStore;
    pub use crate::config::{Config, DatabaseConfig};
    pub use crate::error::{Error, Result};
    pub use crate::health::health;
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::server::{build_router, Server};
    pub use crate::state::AppState;
}
