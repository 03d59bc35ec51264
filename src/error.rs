use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Store call timed out after {0:?}")]
    StoreTimeout(std::time::Duration),

    #[error("Slug not found: {0}")]
    SlugNotFound(String),

    #[error("No default URL configured")]
    NoFallback,

    #[error("Missing url parameter")]
    MissingUrl,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Slug allocation failed after {0} attempts")]
    SlugAllocationExhausted(u32),

    #[error("Slug collided twice on insert: {0}")]
    SlugCollision(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Configuration key not set: {0}")]
    MissingConfigKey(&'static str),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Configuration(e.to_string())
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, error_code) = match &self {
            AppError::SlugNotFound(slug) => {
                tracing::debug!(slug = %slug, "Slug not found");
                (StatusCode::NOT_FOUND, self.to_string(), "NOT_FOUND")
            }
            AppError::NoFallback => (StatusCode::NOT_FOUND, "Not found".to_string(), "NOT_FOUND"),
            AppError::MissingUrl => (StatusCode::BAD_REQUEST, self.to_string(), "MISSING_URL"),
            AppError::InvalidUrl(_) => (StatusCode::BAD_REQUEST, self.to_string(), "INVALID_URL"),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    "DATABASE_ERROR",
                )
            }
            AppError::StoreTimeout(d) => {
                tracing::error!("Store call timed out after {:?}", d);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    "DATABASE_ERROR",
                )
            }
            AppError::MissingConfigKey(key) => {
                tracing::error!(key = %key, "Required configuration key is not set");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Service is misconfigured".to_string(),
                    "CONFIGURATION_ERROR",
                )
            }
            _ => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    "INTERNAL_ERROR",
                )
            }
        };

        let body = json!({
            "error": error_code,
            "message": error_message,
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for AppResult
pub type AppResult<T> = Result<T, AppError>;
