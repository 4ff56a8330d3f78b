//! HTTP response parser for the Gemini API.

use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::{map_http_status_with_body, GeminiError};
use super::http::HttpResponse;

/// Parser for HTTP responses from the Gemini API.
pub struct ResponseParser;

impl ResponseParser {
    /// Parses a successful HTTP response into the expected type, or maps a
    /// non-2xx response to a `GeminiError`.
    pub fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, GeminiError> {
        if (200..300).contains(&response.status) {
            let parsed: T = serde_json::from_slice(&response.body)?;
            Ok(parsed)
        } else {
            Err(Self::parse_error_response(&response))
        }
    }

    /// Maps an error response and logs it with the API's request id.
    pub fn parse_error_response(response: &HttpResponse) -> GeminiError {
        let error = map_http_status_with_body(response.status, &response.body);

        let request_id = Self::extract_request_id(&response.headers);
        tracing::debug!(
            request_id = request_id.as_deref().unwrap_or("-"),
            status = response.status,
            error = %error,
            "Gemini API returned an error"
        );

        error
    }

    /// Extracts a request id for correlation, if the API sent one.
    pub fn extract_request_id(headers: &HashMap<String, String>) -> Option<String> {
        const CANDIDATES: [&str; 3] = ["x-request-id", "x-goog-request-id", "request-id"];

        headers
            .iter()
            .find(|(key, _)| CANDIDATES.iter().any(|c| key.eq_ignore_ascii_case(c)))
            .map(|(_, value)| value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthenticationError, RateLimitError, RequestError, ServerError};
    use bytes::Bytes;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct TestResponse {
        name: String,
        value: i32,
    }

    fn create_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    #[test]
    fn test_parse_successful_response() {
        let response = create_response(200, r#"{"name":"test","value":42}"#);
        let parsed: TestResponse = ResponseParser::parse_response(response).unwrap();

        assert_eq!(parsed, TestResponse { name: "test".into(), value: 42 });
    }

    #[test]
    fn test_parse_malformed_success_body() {
        let response = create_response(200, "not json");
        let error = ResponseParser::parse_response::<TestResponse>(response).unwrap_err();

        assert!(matches!(error, GeminiError::Response(_)));
    }

    #[test]
    fn test_parse_400_validation_error() {
        let response = create_response(400, r#"{"error":{"message":"Invalid request"}}"#);
        let error = ResponseParser::parse_response::<TestResponse>(response).unwrap_err();

        assert!(matches!(error, GeminiError::Request(RequestError::ValidationError { .. })));
    }

    #[test]
    fn test_parse_401_auth_error() {
        let response = create_response(401, r#"{"error":{"message":"Invalid API key"}}"#);
        let error = ResponseParser::parse_response::<TestResponse>(response).unwrap_err();

        assert!(matches!(error, GeminiError::Authentication(AuthenticationError::InvalidApiKey)));
    }

    #[test]
    fn test_parse_429_rate_limit() {
        let response = create_response(429, r#"{"error":{"message":"Too many requests"}}"#);
        let error = ResponseParser::parse_response::<TestResponse>(response).unwrap_err();

        assert!(matches!(error, GeminiError::RateLimit(RateLimitError::TooManyRequests)));
    }

    #[test]
    fn test_parse_503_service_unavailable() {
        let response = create_response(503, r#"{"error":{"message":"Service unavailable"}}"#);
        let error = ResponseParser::parse_response::<TestResponse>(response).unwrap_err();

        assert!(matches!(error, GeminiError::Server(ServerError::ServiceUnavailable)));
    }

    #[test]
    fn test_extract_request_id_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("X-Goog-Request-ID".to_string(), "goog123".to_string());

        assert_eq!(ResponseParser::extract_request_id(&headers), Some("goog123".to_string()));
        assert_eq!(ResponseParser::extract_request_id(&HashMap::new()), None);
    }
}
