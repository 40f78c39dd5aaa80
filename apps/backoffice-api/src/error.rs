//! # API Errors
//!
//! What the client sees when a request fails.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ─► CoreError ─┐                                       │
//! │  sqlx::Error ─────► DbError ───┼─► ApiError { code, message }          │
//! │  Json/Query/Path rejections ───┘        │                              │
//! │                                         ▼                              │
//! │  VALIDATION_ERROR → 400   NOT_FOUND → 404   INTERNAL → 500             │
//! │                                         │                              │
//! │  attach_error_path middleware fills in the request path               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Body of every error response:
//!
//! ```json
//! {
//!   "timestamp": "2026-03-02T10:15:00Z",
//!   "status": 400,
//!   "error": "Bad Request",
//!   "code": "VALIDATION_ERROR",
//!   "message": "Insufficient stock for product A: available 7, requested 8",
//!   "path": "/vendas"
//! }
//! ```

use std::any::Any;
use std::fmt;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::Request;
use axum::http::{StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, warn};

use backoffice_core::{CoreError, ValidationError};
use backoffice_db::DbError;

/// Message returned in place of internal failure details.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Error category exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// An error on its way to the client.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn internal() -> Self {
        Self::new(ErrorCode::Internal, INTERNAL_MESSAGE)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }

    /// Renders the JSON error body for a request path.
    fn render(&self, path: &str) -> Response {
        let status = self.status();
        let body = ErrorBody {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown"),
            code: self.code,
            message: &self.message,
            path,
        };

        (status, Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Serialize)]
struct ErrorBody<'a> {
    timestamp: String,
    status: u16,
    error: &'a str,
    code: ErrorCode,
    message: &'a str,
    path: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // The path is unknown here; attach_error_path re-renders with it.
        let mut response = self.render("");
        response.extensions_mut().insert(self);
        response
    }
}

/// Re-renders error responses so their body carries the request path.
pub async fn attach_error_path(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    if let Some(api_error) = response.extensions().get::<ApiError>().cloned() {
        return api_error.render(&path);
    }
    response
}

/// Turns a handler panic into the generic internal error body.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    error!(panic = %detail, "Handler panicked");
    ApiError::internal().into_response()
}

/// Router fallback for unknown routes.
pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

// =============================================================================
// Conversions
// =============================================================================

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        if err.is_not_found() {
            ApiError::not_found(err.to_string())
        } else {
            ApiError::validation(err.to_string())
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::not_found(err.to_string()),
            DbError::UniqueViolation { .. } | DbError::CheckViolation { .. } => {
                ApiError::validation(err.to_string())
            }
            DbError::ForeignKeyViolation { .. } => {
                warn!(error = %err, "Foreign key violation reached the API");
                ApiError::validation(err.to_string())
            }
            _ => {
                error!(error = %err, "Database error");
                ApiError::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
