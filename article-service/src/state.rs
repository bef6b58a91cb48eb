//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::articles::{ArticleService, ArticleStore, QueryLimits};
use crate::config::Config;

/// Application state shared across handlers
///
/// Generic over the article store so tests can inject the in-memory store.
pub struct AppState<S> {
    config: Arc<Config>,
    articles: Arc<ArticleService<S>>,
    limits: QueryLimits,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            articles: Arc::clone(&self.articles),
            limits: self.limits,
        }
    }
}

impl<S: ArticleStore> AppState<S> {
    /// Wrap `store` in an [`ArticleService`] configured from `config`
    pub fn new(config: Config, store: S) -> Self {
        let articles = ArticleService::new(store).with_query_timeout(config.articles.query_timeout());
        Self {
            limits: config.articles.query_limits(),
            config: Arc::new(config),
            articles: Arc::new(articles),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn articles(&self) -> &ArticleService<S> {
        &self.articles
    }
}

impl<S> FromRef<AppState<S>> for QueryLimits {
    fn from_ref(state: &AppState<S>) -> Self {
        state.limits
    }
}
