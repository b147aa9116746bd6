//! Error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors raised while resolving or rendering SEO tags.
#[derive(Debug, Error)]
pub enum SeoError {
    /// A resolved value was neither a string nor null.
    #[error("invalid type of {value_type} to resolve SEO value for {key} from {source_name} on {model}")]
    TypeMismatch {
        key: String,
        source_name: String,
        value_type: &'static str,
        model: String,
    },

    /// The configured data column is not stored as JSON on the model.
    #[error(
        "the seoable data column \"{column}\" is not defined as jsonable on the model \"{model}\""
    )]
    NotJsonable { column: String, model: String },

    #[error("failed to render SEO tags")]
    Render(#[from] tera::Error),
}

/// Result type alias using SeoError.
pub type SeoResult<T> = Result<T, SeoError>;

/// HTTP-facing application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("not found")]
    NotFound,

    #[error("seo error")]
    Seo(#[from] SeoError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Seo(SeoError::TypeMismatch { .. } | SeoError::NotJsonable { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Internal(_) | AppError::Seo(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
        };

        // Record errors describe the request; anything else stays in the log
        let body = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                "internal server error".to_string()
            }
            AppError::Seo(e @ (SeoError::TypeMismatch { .. } | SeoError::NotJsonable { .. })) => {
                e.to_string()
            }
            AppError::Seo(e) => {
                tracing::error!(error = %e, "seo error");
                "internal server error".to_string()
            }
            AppError::NotFound => self.to_string(),
        };

        (status, body).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
