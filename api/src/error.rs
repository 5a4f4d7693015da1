//! Unified error types for the Shop API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic and persistence errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)
//! - `FormError`: Malformed shop form fields

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Domain(DomainError::NotFound(_)) | AppError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::Domain(DomainError::AlreadyExists(_)) => StatusCode::CONFLICT,
            AppError::Domain(DomainError::Validation(_)) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Domain(DomainError::Database(_))
            | AppError::Domain(DomainError::Internal(_))
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (error, details) = match &self {
            AppError::Domain(DomainError::NotFound(msg)) => ("Not found", Some(msg.clone())),
            AppError::Domain(DomainError::AlreadyExists(msg)) => {
                ("Already exists", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Validation(msg)) => {
                ("Validation error", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                ("Internal server error", None)
            }
            AppError::Domain(DomainError::Internal(msg)) | AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error", None)
            }
            AppError::BadRequest(msg) => ("Bad request", Some(msg.clone())),
            AppError::Unauthorized => ("Unauthorized", None),
            AppError::Forbidden => ("Forbidden", None),
            AppError::NotFound(msg) => ("Not found", Some(msg.clone())),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (self.status(), body).into_response()
    }
}

/// Errors from decoding shop form fields
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Invalid quantity for {field}: {value:?}")]
    InvalidQuantity { field: String, value: String },

    #[error("Invalid item id in field name: {0}")]
    InvalidItemId(String),
}

impl From<FormError> for AppError {
    fn from(e: FormError) -> Self {
        AppError::Domain(DomainError::Validation(e.to_string()))
    }
}
