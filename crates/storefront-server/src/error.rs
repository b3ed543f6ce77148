//! Mapping of domain errors to HTTP responses.
//!
//! Bodies carry the stable error code and the public message only; the
//! detailed `Display` text stays in the logs.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use storefront_commerce::{CommerceError, ErrorKind};

/// Handler error wrapping a [`CommerceError`].
#[derive(Debug)]
pub struct ApiError(pub CommerceError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            // The write was accepted; only derived data is behind.
            ErrorKind::Consistency => StatusCode::ACCEPTED,
        }
    }
}

impl From<CommerceError> for ApiError {
    fn from(e: CommerceError) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(CommerceError::MalformedRequest(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(CommerceError::MalformedRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let err = &self.0;

        let body = match err {
            CommerceError::AggregateUpdateFailed { review_id, .. } => json!({
                "success": true,
                "message": "Review submitted successfully",
                "review_id": review_id,
                "warning": {
                    "error": err.code(),
                    "message": err.public_message(),
                },
            }),
            _ => json!({
                "success": false,
                "error": err.code(),
                "message": err.public_message(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
