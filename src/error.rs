use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::storage::StorageError;

/// AppError
///
/// The single error type flowing out of services and repositories. Each variant maps to
/// one HTTP status code; handlers return `Result<_, AppError>` and let `IntoResponse`
/// render the `{"error": "..."}` body.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad or missing input, malformed identifiers, uniqueness violations.
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or a missing, malformed, or expired token.
    #[error("{0}")]
    Authentication(String),

    /// The caller is authenticated but may not act on the resource.
    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    NotFound(String),

    /// The request body exceeded the route's limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Maps an axum extractor rejection. Client-side failures are bad input, except an
    /// oversized body which keeps its 413.
    fn from_rejection(status: StatusCode, message: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(message)
        } else if status.is_server_error() {
            Self::Internal(message)
        } else {
            Self::Validation(message)
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Database(_) | Self::Storage(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Unique violations are reported as bad input so a duplicate signup reads as a 400,
/// and `RowNotFound` from `fetch_one` becomes a plain 404.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::not_found("record not found"),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                match db.constraint() {
                    Some("users_email_key") => {
                        Self::validation("a user with this email already exists")
                    }
                    _ => Self::validation("record already exists"),
                }
            }
            _ => Self::Database(err),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Internal(format!("password hashing failed: {err}"))
    }
}

macro_rules! impl_from_rejection {
    ($($rejection:ty),+ $(,)?) => {
        $(
            impl From<$rejection> for AppError {
                fn from(rejection: $rejection) -> Self {
                    Self::from_rejection(rejection.status(), rejection.body_text())
                }
            }
        )+
    };
}

impl_from_rejection!(
    PathRejection,
    QueryRejection,
    JsonRejection,
    MultipartRejection,
    MultipartError,
);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side details stay in the logs.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
