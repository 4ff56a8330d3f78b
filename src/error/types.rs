//! Main error type for the Gemini API client.

use thiserror::Error;
use super::categories::*;

/// Result type alias for Gemini operations.
pub type GeminiResult<T> = Result<T, GeminiError>;

/// Top-level error type for the Gemini client.
#[derive(Error, Debug, Clone)]
pub enum GeminiError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Rate limit error: {0}")]
    RateLimit(#[from] RateLimitError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),
}

impl GeminiError {
    /// The most specific human-readable message carried by this error.
    ///
    /// Messages relayed from the API or the network layer are returned bare,
    /// so `ConnectionFailed { message: "upstream down" }` yields `"upstream down"`.
    pub fn upstream_message(&self) -> String {
        match self {
            GeminiError::Request(RequestError::ValidationError { message })
            | GeminiError::Request(RequestError::PayloadTooLarge { message })
            | GeminiError::Network(NetworkError::ConnectionFailed { message })
            | GeminiError::Server(ServerError::InternalError { message })
            | GeminiError::Server(ServerError::ModelOverloaded { message })
            | GeminiError::Authentication(AuthenticationError::PermissionDenied { message })
            | GeminiError::Response(ResponseError::DeserializationError { message })
            | GeminiError::Response(ResponseError::UnexpectedFormat { message }) => message.clone(),
            GeminiError::Configuration(e) => e.to_string(),
            GeminiError::Authentication(e) => e.to_string(),
            GeminiError::Request(e) => e.to_string(),
            GeminiError::RateLimit(e) => e.to_string(),
            GeminiError::Network(e) => e.to_string(),
            GeminiError::Server(e) => e.to_string(),
            GeminiError::Resource(e) => e.to_string(),
        }
    }
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeminiError::Network(NetworkError::Timeout)
        } else {
            GeminiError::Network(NetworkError::ConnectionFailed {
                message: err.to_string(),
            })
        }
    }
}

impl From<serde_json::Error> for GeminiError {
    fn from(err: serde_json::Error) -> Self {
        GeminiError::Response(ResponseError::DeserializationError {
            message: err.to_string(),
        })
    }
}

impl From<url::ParseError> for GeminiError {
    fn from(err: url::ParseError) -> Self {
        GeminiError::Configuration(ConfigurationError::InvalidBaseUrl {
            url: err.to_string(),
        })
    }
}
