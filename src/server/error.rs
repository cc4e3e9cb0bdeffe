//! API error type and JSON error bodies.
//!
//! Store failures are all reported with status 500; callers tell them apart
//! by the `code` field.

use axum::{
    Json,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, error};

use crate::store::{MovieError, ParseObjectIdError};

/// API error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    code: &'static str,
}

/// API error type that converts to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// No route matches the request.
    pub fn route_not_found(method: &Method, uri: &Uri) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "ROUTE_NOT_FOUND",
            format!("No route for {} {}", method, uri.path()),
        )
    }

    /// The route exists but does not accept this method.
    pub fn method_not_allowed(method: &Method, uri: &Uri) -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            "METHOD_NOT_ALLOWED",
            format!("Method {} not allowed for {}", method, uri.path()),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log server errors at error level, client errors at debug level
        if self.status.is_server_error() {
            error!(
                status = %self.status.as_u16(),
                code = %self.code,
                message = %self.message,
                "server error response"
            );
        } else if self.status.is_client_error() {
            debug!(
                status = %self.status.as_u16(),
                code = %self.code,
                message = %self.message,
                "client error response"
            );
        }

        let body = ErrorBody {
            message: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<MovieError> for ApiError {
    fn from(err: MovieError) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            err.kind().code(),
            err.to_string(),
        )
    }
}

impl From<ParseObjectIdError> for ApiError {
    fn from(err: ParseObjectIdError) -> Self {
        MovieError::from(err).into()
    }
}
