//! Transport layer error types.

use crate::error::{GeminiError, NetworkError};

/// Transport error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Timeout")]
    Timeout,
    #[error("Request error: {0}")]
    Request(String),
}

impl From<TransportError> for GeminiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => GeminiError::Network(NetworkError::Timeout),
            TransportError::Connection(message) | TransportError::Request(message) => {
                GeminiError::Network(NetworkError::ConnectionFailed { message })
            }
        }
    }
}
