/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - SnsError / extractor の失敗を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::{Resource, SnsError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("{code}: {message}")]
    Conflict { code: &'static str, message: String },
    #[error("request timed out")]
    Timeout,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found."),
            ),
            AppError::Conflict { code, message } => (StatusCode::CONFLICT, code, message),
            AppError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                "REQUEST_TIMEOUT",
                "request timed out".into(),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<SnsError> for AppError {
    fn from(e: SnsError) -> Self {
        match e {
            SnsError::InvalidInput(message) => AppError::bad_request("INVALID_INPUT", message),
            SnsError::NotFound(resource) => AppError::not_found(resource.as_str()),
            SnsError::Conflict => {
                AppError::conflict("ALREADY_LIKED", already_exists_message(Resource::Like))
            }
            SnsError::Store(source) => {
                // Only place backend failures are logged; the client sees a bare 500.
                tracing::error!(error = ?source, "store operation failed");
                AppError::Internal
            }
        }
    }
}

fn already_exists_message(resource: Resource) -> String {
    format!("{resource} already exists for this user and post")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::error::RepoError;

    fn status_of(e: SnsError) -> StatusCode {
        AppError::from(e).into_response().status()
    }

    #[test]
    fn sns_errors_map_to_http_statuses() {
        assert_eq!(
            status_of(SnsError::InvalidInput("content is required")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(SnsError::NotFound(Resource::Comment)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(SnsError::Conflict), StatusCode::CONFLICT);
        assert_eq!(
            status_of(SnsError::Store(RepoError::Db(sqlx::Error::PoolTimedOut))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
