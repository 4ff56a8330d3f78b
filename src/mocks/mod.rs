//! Mock implementations for testing.
//!
//! These let tests drive the handler and the Gemini client without network
//! access, enqueueing canned responses and inspecting what was sent.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{GeminiError, NetworkError};
use crate::handler::{DataUrl, ImageGenerator};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::types::Blob;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock HTTP transport for testing.
///
/// # Example
///
/// ```
/// use portrait_transform::mocks::MockHttpTransport;
/// use portrait_transform::transport::{HttpMethod, HttpRequest, HttpTransport};
/// use std::collections::HashMap;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let transport = MockHttpTransport::new();
/// transport.enqueue_json_response(200, r#"{"candidates": []}"#);
///
/// let request = HttpRequest {
///     method: HttpMethod::Post,
///     url: "https://example.com".to_string(),
///     headers: HashMap::new(),
///     body: None,
/// };
///
/// let response = transport.send(request).await.unwrap();
/// assert_eq!(response.status, 200);
/// transport.verify_request_count(1);
/// # });
/// ```
#[derive(Default)]
pub struct MockHttpTransport {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockHttpTransport {
    /// Create a new mock HTTP transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a response to be returned by the next request.
    pub fn enqueue_response(&self, response: Result<HttpResponse, TransportError>) {
        lock(&self.responses).push_back(response);
    }

    /// Enqueue a JSON response with the given status code and body.
    pub fn enqueue_json_response(&self, status: u16, body: &str) {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        self.enqueue_response(Ok(HttpResponse {
            status,
            body: Bytes::from(body.to_string()),
            headers,
        }));
    }

    /// Enqueue a transport error.
    pub fn enqueue_error(&self, error: TransportError) {
        self.enqueue_response(Err(error));
    }

    /// Get all requests that were made.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Get the last request that was made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Verify that exactly `expected` requests were made.
    pub fn verify_request_count(&self, expected: usize) {
        let actual = lock(&self.requests).len();
        assert_eq!(actual, expected, "Expected {expected} requests, got {actual}");
    }

    /// Verify that a request was made with the expected method and URL fragment.
    pub fn verify_request(&self, index: usize, method: HttpMethod, url_contains: &str) {
        let requests = lock(&self.requests);
        assert!(index < requests.len(), "No request at index {index}");

        let request = &requests[index];
        assert_eq!(request.method, method, "Expected method {method:?}, got {:?}", request.method);
        assert!(
            request.url.contains(url_contains),
            "Expected URL to contain '{url_contains}', got '{}'",
            request.url
        );
    }

    /// Verify that a request carried a header with the given value.
    pub fn verify_header(&self, index: usize, header_name: &str, header_value: &str) {
        let requests = lock(&self.requests);
        assert!(index < requests.len(), "No request at index {index}");

        let actual_value = requests[index].headers.get(header_name);
        assert_eq!(
            actual_value.map(String::as_str),
            Some(header_value),
            "Expected header '{header_name}' to be '{header_value}', got {actual_value:?}"
        );
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request);

        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Err(TransportError::Connection(
                "No response configured in MockHttpTransport".to_string(),
            ))
        })
    }
}

/// One recorded `generate_image` invocation.
#[derive(Debug, Clone)]
pub struct GeneratorCall {
    /// Prompt passed to the generator.
    pub prompt: String,
    /// Source image passed to the generator.
    pub image: DataUrl,
}

/// Mock `ImageGenerator` with queued results.
#[derive(Default)]
pub struct MockImageGenerator {
    results: Mutex<VecDeque<Result<Option<Blob>, GeminiError>>>,
    calls: Mutex<Vec<GeneratorCall>>,
}

impl MockImageGenerator {
    /// Create a mock with no queued results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an arbitrary result.
    pub fn enqueue_result(&self, result: Result<Option<Blob>, GeminiError>) {
        lock(&self.results).push_back(result);
    }

    /// Queue a generated image.
    pub fn enqueue_image(&self, mime_type: &str, data: &str) {
        self.enqueue_result(Ok(Some(Blob {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })));
    }

    /// Queue a connection failure carrying `message`.
    pub fn enqueue_error(&self, message: &str) {
        self.enqueue_result(Err(GeminiError::Network(NetworkError::ConnectionFailed {
            message: message.to_string(),
        })));
    }

    /// Recorded calls, oldest first.
    pub fn calls(&self) -> Vec<GeneratorCall> {
        lock(&self.calls).clone()
    }

    /// Number of recorded calls.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate_image(&self, prompt: &str, image: &DataUrl) -> Result<Option<Blob>, GeminiError> {
        lock(&self.calls).push(GeneratorCall {
            prompt: prompt.to_string(),
            image: image.clone(),
        });

        lock(&self.results).pop_front().unwrap_or_else(|| {
            Err(GeminiError::Network(NetworkError::ConnectionFailed {
                message: "No result configured in MockImageGenerator".to_string(),
            }))
        })
    }
}
