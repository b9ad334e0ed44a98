use crate::model::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tinylink_core::StoreError;
use tinylink_generator::GeneratorError;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    /// Unknown, expired and malformed tokens all end up here.
    #[error("short url not found")]
    NotFound,
    #[error(transparent)]
    Generation(#[from] GeneratorError),
    #[error(transparent)]
    Store(StoreError),
    #[error("{0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(_) => AppError::NotFound,
            other => AppError::Store(other),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store(e) if e.is_transient() => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Generation(_) | AppError::Store(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "Request failed");
        }

        // Internal details stay in the log.
        let message = match &self {
            AppError::BadRequest(_) | AppError::NotFound => self.to_string(),
            _ => status
                .canonical_reason()
                .unwrap_or("internal error")
                .to_ascii_lowercase(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
