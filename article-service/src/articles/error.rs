//! Store and API error types
//!
//! [`StoreError`] describes what went wrong inside an [`ArticleStore`](super::ArticleStore);
//! [`ApiError`] is what a handler returns and renders as the
//! `{"success": false, "error": ...}` envelope with a matching status code.
//!
//! # Example
//!
//! ```rust
//! use article_service::articles::{ApiError, ApiErrorKind, StoreError, StoreOperation};
//! use axum::http::StatusCode;
//!
//! let err: ApiError = StoreError::timeout(StoreOperation::Find, "query exceeded 10s").into();
//! assert_eq!(err.kind, ApiErrorKind::ServiceUnavailable);
//! assert_eq!(err.kind.status_code(), StatusCode::SERVICE_UNAVAILABLE);
//! assert_eq!(err.message, "Service temporarily unavailable");
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::response::ErrorResponse;

/// Store operation in progress when an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    FindById,
    Find,
    Count,
    Insert,
    Replace,
    Delete,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FindById => write!(f, "find_by_id"),
            Self::Find => write!(f, "find"),
            Self::Count => write!(f, "count"),
            Self::Insert => write!(f, "insert"),
            Self::Replace => write!(f, "replace"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of store error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// Article was not found
    NotFound,
    /// Could not reach the database
    ConnectionFailed,
    /// Operation exceeded the query timeout
    Timeout,
    /// Underlying database error
    DatabaseError,
    /// Document could not be encoded or decoded
    SerializationError,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DatabaseError => write!(f, "database_error"),
            Self::SerializationError => write!(f, "serialization_error"),
        }
    }
}

/// Structured store error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub operation: StoreOperation,
    pub kind: StoreErrorKind,
    pub message: String,
    /// Identifier of the article involved, when there is one
    pub entity_id: Option<String>,
}

impl StoreError {
    pub fn new(operation: StoreOperation, kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_id: None,
        }
    }

    /// Article with `id` does not exist
    pub fn not_found(operation: StoreOperation, id: impl Into<String>) -> Self {
        Self {
            operation,
            kind: StoreErrorKind::NotFound,
            message: "Article not found".to_string(),
            entity_id: Some(id.into()),
        }
    }

    pub fn timeout(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::Timeout, message)
    }

    pub fn database(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::DatabaseError, message)
    }

    pub fn serialization(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::SerializationError, message)
    }

    /// Attach the article identifier
    #[must_use]
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Store {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(id) = &self.entity_id {
            write!(f, " [Article: {}]", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {}

/// Handler operation in progress when an API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of API error, determines the HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    NotFound,
    ValidationFailed,
    InternalError,
    ServiceUnavailable,
}

impl ApiErrorKind {
    /// HTTP status for this kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ValidationFailed => StatusCode::BAD_REQUEST,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Whether this kind is the server's fault
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::InternalError | Self::ServiceUnavailable)
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::InternalError => write!(f, "internal_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
        }
    }
}

/// Error returned from article handlers
///
/// `message` is client-facing. Backend details stay in `detail` and only
/// reach the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub operation: ApiOperation,
    pub kind: ApiErrorKind,
    pub message: String,
    pub entity_id: Option<String>,
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_id: None,
            detail: None,
        }
    }

    /// Unknown or malformed article identifier
    pub fn not_found(operation: ApiOperation, id: impl Into<String>) -> Self {
        Self {
            entity_id: Some(id.into()),
            ..Self::new(operation, ApiErrorKind::NotFound, "Article not found")
        }
    }

    pub fn validation(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::ValidationFailed, message)
    }

    /// Attribute a converted store error to the handler operation
    #[must_use]
    pub fn during(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let operation = match err.operation {
            StoreOperation::FindById => ApiOperation::Get,
            StoreOperation::Find | StoreOperation::Count => ApiOperation::List,
            StoreOperation::Insert => ApiOperation::Create,
            StoreOperation::Replace => ApiOperation::Update,
            StoreOperation::Delete => ApiOperation::Delete,
        };

        let (kind, message) = match err.kind {
            StoreErrorKind::NotFound => (ApiErrorKind::NotFound, err.message.clone()),
            StoreErrorKind::ConnectionFailed | StoreErrorKind::Timeout => (
                ApiErrorKind::ServiceUnavailable,
                "Service temporarily unavailable".to_string(),
            ),
            StoreErrorKind::DatabaseError | StoreErrorKind::SerializationError => (
                ApiErrorKind::InternalError,
                "An internal error occurred".to_string(),
            ),
        };

        Self {
            operation,
            kind,
            message,
            entity_id: err.entity_id.clone(),
            detail: Some(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        if self.kind.is_server_error() {
            tracing::error!(
                operation = %self.operation,
                kind = %self.kind,
                entity_id = ?self.entity_id,
                detail = ?self.detail,
                "API error: {}", self.message
            );
        } else {
            tracing::warn!(
                operation = %self.operation,
                kind = %self.kind,
                entity_id = ?self.entity_id,
                "API error: {}", self.message
            );
        }

        (status, ErrorResponse::new(self.message)).into_response()
    }
}
