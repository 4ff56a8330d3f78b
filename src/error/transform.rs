//! Outcomes of the transform handler that end a request early.

use axum::http::StatusCode;
use thiserror::Error;

use super::types::GeminiError;

/// Fallback when an upstream failure carries no message.
pub const FALLBACK_MESSAGE: &str = "Transformation failed";

/// Failure kinds of a single transform request.
#[derive(Error, Debug, Clone)]
pub enum TransformError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid request body")]
    InvalidBody,

    #[error("Request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("No image provided")]
    MissingImage,

    #[error("Invalid image data URL: {reason}")]
    InvalidDataUrl { reason: String },

    #[error("API key not configured")]
    ApiKeyNotConfigured,

    #[error("No image returned from API")]
    NoImageReturned,

    #[error("{}", upstream_text(.0))]
    Upstream(#[from] GeminiError),
}

fn upstream_text(err: &GeminiError) -> String {
    let message = err.upstream_message();
    if message.trim().is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

impl TransformError {
    /// HTTP status reported for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            TransformError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            TransformError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            TransformError::InvalidBody
            | TransformError::MissingImage
            | TransformError::InvalidDataUrl { .. } => StatusCode::BAD_REQUEST,
            TransformError::ApiKeyNotConfigured
            | TransformError::NoImageReturned
            | TransformError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
