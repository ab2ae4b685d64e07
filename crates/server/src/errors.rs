use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use service::auth::AuthError;
use service::errors::ServiceError;

/// Error body returned by every handler: `{ "error", "message", "code" }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: String,
    pub detail: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
    code: u16,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { status, title: title.into(), detail: detail.into() }
    }

    fn with_status(status: StatusCode, detail: impl Into<String>) -> Self {
        let title = status.canonical_reason().unwrap_or("Error");
        Self::new(status, title, detail)
    }

    pub fn bad_request(detail: impl Into<String>) -> Self { Self::with_status(StatusCode::BAD_REQUEST, detail) }

    pub fn unauthorized(detail: impl Into<String>) -> Self { Self::with_status(StatusCode::UNAUTHORIZED, detail) }

    pub fn internal(detail: impl Into<String>) -> Self { Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, detail) }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), detail = %self.detail, "request failed");
        } else {
            warn!(status = self.status.as_u16(), detail = %self.detail, "request rejected");
        }
        let body = ErrorBody { error: &self.title, message: &self.detail, code: self.status.as_u16() };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(m) => Self::bad_request(m),
            ServiceError::Unauthorized(m) => Self::unauthorized(m),
            ServiceError::Forbidden(m) => Self::with_status(StatusCode::FORBIDDEN, m),
            ServiceError::NotFound(m) => Self::with_status(StatusCode::NOT_FOUND, m),
            ServiceError::Conflict(m) => Self::with_status(StatusCode::CONFLICT, m),
            ServiceError::Upstream(m) => Self::with_status(StatusCode::BAD_GATEWAY, m),
            ServiceError::Db(m) | ServiceError::Internal(m) => {
                error!(error = %m, "internal failure");
                Self::internal("internal server error")
            }
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => Self::unauthorized("invalid email or password"),
            AuthError::InvalidToken(m) => Self::unauthorized(m),
            AuthError::TokenError(m) => {
                error!(error = %m, "token signing failed");
                Self::internal("internal server error")
            }
            AuthError::Service(inner) => inner.into(),
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self { Self::bad_request(r.body_text()) }
}

impl From<QueryRejection> for JsonApiError {
    fn from(r: QueryRejection) -> Self { Self::bad_request(r.body_text()) }
}

impl From<PathRejection> for JsonApiError {
    fn from(r: PathRejection) -> Self { Self::bad_request(r.body_text()) }
}

impl From<MultipartRejection> for JsonApiError {
    fn from(r: MultipartRejection) -> Self { Self::with_status(r.status(), r.body_text()) }
}

impl From<MultipartError> for JsonApiError {
    fn from(e: MultipartError) -> Self { Self::with_status(e.status(), e.body_text()) }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("image host client: {0}")]
    ImageHost(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
