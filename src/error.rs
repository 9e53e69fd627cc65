#![cfg(feature = "web")]
//! Error type for the HTTP handlers.
//!
//! Each variant maps to a status code; bodies are plain text like the rest
//! of the HTML-facing app.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::record::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid form or request data (400).
    #[error("{0}")]
    BadRequest(String),

    /// Missing file or session data (404).
    #[error("{0}")]
    NotFound(String),

    /// Filesystem failure (500).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Template rendering failure (500).
    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// CSV/XLSX/PNG generation failure (500).
    #[error("Export error: {0}")]
    Export(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Io(_) | AppError::Template(_) | AppError::Export(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        (status, self.to_string()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_requests() {
        let err: AppError = ValidationError::InvalidMonth.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "Invalid month selection. Only 0, 3, 6, or 9 months are allowed."
        );
    }

    #[test]
    fn maps_statuses() {
        assert_eq!(
            AppError::NotFound("sales_data.json not found".into()).status(),
            StatusCode::NOT_FOUND
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(AppError::from(io).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::Export("bad".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
