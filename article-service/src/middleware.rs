//! Request tracking and panic recovery
//!
//! Every request gets a UUIDv7 request ID (unless the caller sent one), the
//! ID is echoed on the response, and credential headers are marked sensitive
//! so the trace layer never logs them.

use std::any::Any;

use axum::{
    http::{HeaderName, Request, StatusCode},
    response::{IntoResponse, Response},
};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

use crate::articles::ErrorResponse;

/// Default request ID header
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Sensitive headers that should be masked in logs
pub const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
];

/// Generates time-ordered request IDs
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        uuid::Uuid::now_v7()
            .to_string()
            .parse()
            .ok()
            .map(RequestId::new)
    }
}

/// Resolve the configured header name, falling back to `x-request-id`
pub fn request_id_header(name: &str) -> HeaderName {
    HeaderName::try_from(name).unwrap_or_else(|_| {
        tracing::warn!(header = name, "Invalid request ID header name, using default");
        HeaderName::from_static(REQUEST_ID_HEADER)
    })
}

pub fn request_id_layer(header: HeaderName) -> SetRequestIdLayer<MakeRequestUuidV7> {
    SetRequestIdLayer::new(header, MakeRequestUuidV7)
}

pub fn request_id_propagation_layer(header: HeaderName) -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(header)
}

pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    SetSensitiveRequestHeadersLayer::new(
        SENSITIVE_HEADERS
            .iter()
            .copied()
            .map(HeaderName::from_static),
    )
}

/// Turn a handler panic into the generic 500 error envelope
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse::new("Internal Server Error"),
    )
        .into_response()
}
