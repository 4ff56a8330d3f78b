//! Error mapping utilities for HTTP status codes and API responses.

use serde::Deserialize;
use super::categories::*;
use super::types::GeminiError;

/// Structured API error response from Gemini.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Detailed error information from API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub status: String,
}

/// Maps HTTP status codes and response body to appropriate GeminiError variants.
///
/// The API message is preserved verbatim wherever the variant carries one, so
/// it can be relayed to the caller of the transform endpoint.
pub fn map_http_status_with_body(status: u16, body: &[u8]) -> GeminiError {
    let (message, api_status) = match serde_json::from_slice::<ApiErrorResponse>(body) {
        Ok(parsed) => (parsed.error.message, parsed.error.status),
        Err(_) => (String::from_utf8_lossy(body).trim().to_string(), String::new()),
    };

    match status {
        400 => GeminiError::Request(RequestError::ValidationError { message }),

        401 => GeminiError::Authentication(AuthenticationError::InvalidApiKey),

        403 => {
            if message.to_lowercase().contains("quota") {
                GeminiError::Authentication(AuthenticationError::QuotaExceeded)
            } else {
                GeminiError::Authentication(AuthenticationError::PermissionDenied { message })
            }
        }

        404 => GeminiError::Resource(ResourceError::ModelNotFound {
            model: extract_resource_name(&message),
        }),

        413 => GeminiError::Request(RequestError::PayloadTooLarge { message }),

        415 => GeminiError::Request(RequestError::UnsupportedMediaType {
            mime_type: extract_mime_type(&message),
        }),

        429 => {
            if api_status == "RESOURCE_EXHAUSTED" && message.to_lowercase().contains("quota") {
                GeminiError::RateLimit(RateLimitError::QuotaExceeded)
            } else {
                GeminiError::RateLimit(RateLimitError::TooManyRequests)
            }
        }

        500 => GeminiError::Server(ServerError::InternalError { message }),

        503 => {
            if message.to_lowercase().contains("overload") {
                GeminiError::Server(ServerError::ModelOverloaded { message })
            } else {
                GeminiError::Server(ServerError::ServiceUnavailable)
            }
        }

        _ => GeminiError::Server(ServerError::InternalError {
            message: format!("HTTP {status}: {message}"),
        }),
    }
}

/// Extracts resource name from error message (simple heuristic).
fn extract_resource_name(message: &str) -> String {
    if let Some(found) = message.split_whitespace().find(|s| s.starts_with("models/")) {
        return found
            .trim_matches(|c: char| !c.is_alphanumeric() && c != '/' && c != '-' && c != '_' && c != '.')
            .to_string();
    }

    for quote in ['\'', '"'] {
        if let Some(start) = message.find(quote) {
            if let Some(end) = message[start + 1..].find(quote) {
                return message[start + 1..start + 1 + end].to_string();
            }
        }
    }

    "unknown".to_string()
}

/// Extracts MIME type from error message.
fn extract_mime_type(message: &str) -> String {
    message
        .split_whitespace()
        .find(|word| word.contains('/') && word.parse::<mime::Mime>().is_ok())
        .map_or_else(
            || "unknown".to_string(),
            |word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '/').to_string(),
        )
}
