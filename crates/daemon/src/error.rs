use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;

use catalog::model::TierParseError;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce the JSON `{error}` shape on every
/// failure path. Internal variants carry a client-safe message; the full
/// error is logged at the handler that produced it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Referenced media or sidecar file is absent.
    #[error("{0}")]
    NotFound(&'static str),

    /// Missing required field or a prize type outside the fixed set.
    #[error("{0}")]
    BadRequest(String),

    /// Anything else; the message is already sanitized for the client.
    #[error("{0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<TierParseError> for ApiError {
    fn from(_: TierParseError) -> Self {
        ApiError::BadRequest("Invalid prize type".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

/// Fallback for unmatched routes, after static serving has had its chance.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html("<h1>404 Not Found</h1><p>The page you requested could not be found.</p>"),
    )
        .into_response()
}
