//! HTTP handlers for the `/articles` collection

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};

use super::error::{ApiError, ApiOperation};
use super::model::{Article, CreateArticleRequest, UpdateArticleRequest};
use super::query::ArticleListQuery;
use super::response::{ApiResponse, ListResponse};
use super::store::ArticleStore;
use crate::state::AppState;

/// Routes for the article collection, to be merged into the app router
pub fn routes<S: ArticleStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/articles", get(list_articles::<S>).post(create_article::<S>))
        .route(
            "/articles/{id}",
            get(get_article::<S>)
                .put(update_article::<S>)
                .delete(delete_article::<S>),
        )
}

/// `GET /articles?tags=&author=&limit=&page=`
pub async fn list_articles<S: ArticleStore>(
    State(state): State<AppState<S>>,
    query: ArticleListQuery,
) -> Result<ListResponse<Article>, ApiError> {
    state.articles().list(&query).await
}

/// `GET /articles/{id}`
pub async fn get_article<S: ArticleStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Article>, ApiError> {
    let article = state.articles().get(&id).await?;
    Ok(ApiResponse::ok(article))
}

/// `POST /articles`
pub async fn create_article<S: ArticleStore>(
    State(state): State<AppState<S>>,
    body: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> Result<ApiResponse<Article>, ApiError> {
    let Json(request) = body.map_err(|e| invalid_body(ApiOperation::Create, &e))?;
    let article = state.articles().create(request).await?;
    Ok(ApiResponse::created(article, "Article created successfully"))
}

/// `PUT /articles/{id}`
///
/// An unknown id is reported as 404 even when the body is also malformed.
pub async fn update_article<S: ArticleStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateArticleRequest>, JsonRejection>,
) -> Result<ApiResponse<Article>, ApiError> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            state
                .articles()
                .get(&id)
                .await
                .map_err(|e| e.during(ApiOperation::Update))?;
            return Err(invalid_body(ApiOperation::Update, &rejection));
        }
    };
    let article = state.articles().update(&id, request).await?;
    Ok(ApiResponse::ok(article).with_message("Article updated successfully"))
}

/// `DELETE /articles/{id}`
pub async fn delete_article<S: ArticleStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    state.articles().delete(&id).await?;
    Ok(ApiResponse::message("Article deleted successfully"))
}

fn invalid_body(operation: ApiOperation, rejection: &JsonRejection) -> ApiError {
    ApiError::validation(operation, format!("Invalid request body: {}", rejection.body_text()))
}
