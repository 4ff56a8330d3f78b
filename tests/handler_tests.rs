//! Integration tests for the transform handler over the Gemini content service.

use axum::http::{Method, StatusCode};
use portrait_transform::mocks::MockHttpTransport;
use portrait_transform::transport::{HttpMethod, TransportError};
use portrait_transform::{
    GeminiImageGenerator, TransformConfig, TransformHandler, TransformReply, TransformResponse,
    PORTRAIT_PROMPT,
};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::Arc;

const PNG_REQUEST: &[u8] = br#"{"image":"data:image/png;base64,AAAA"}"#;

/// Helper to create a handler whose Gemini calls hit the mock transport.
fn create_test_handler(transport: Arc<MockHttpTransport>) -> TransformHandler {
    let config = TransformConfig::builder()
        .api_key(SecretString::new("test-key".into()))
        .model("gemini-2.0-flash-exp")
        .build()
        .unwrap();

    let generator = GeminiImageGenerator::with_transport(&config, transport).unwrap();
    TransformHandler::new(Some(Arc::new(generator)))
}

fn error(status: StatusCode, message: &str) -> TransformReply {
    TransformReply {
        status,
        body: TransformResponse::Error { error: message.to_string() },
    }
}

#[tokio::test]
async fn test_successful_transform_returns_data_url() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(200, r#"{
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"inlineData": {"mimeType": "image/jpeg", "data": "BBBB"}}]
            },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {"promptTokenCount": 300, "totalTokenCount": 1590}
    }"#);
    let handler = create_test_handler(transport.clone());

    // Act
    let reply = handler.handle(&Method::POST, PNG_REQUEST).await;

    // Assert
    assert_eq!(
        reply,
        TransformReply {
            status: StatusCode::OK,
            body: TransformResponse::Image { image: "data:image/jpeg;base64,BBBB".to_string() },
        }
    );

    transport.verify_request_count(1);
    transport.verify_request(0, HttpMethod::Post, "/v1beta/models/gemini-2.0-flash-exp:generateContent");
    transport.verify_header(0, "x-goog-api-key", "test-key");
}

#[tokio::test]
async fn test_request_body_carries_prompt_and_inline_image() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(200, r#"{"candidates": []}"#);
    let handler = create_test_handler(transport.clone());

    handler.handle(&Method::POST, PNG_REQUEST).await;

    let request = transport.last_request().unwrap();
    let body: Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {"text": PORTRAIT_PROMPT},
                    {"inlineData": {"mimeType": "image/png", "data": "AAAA"}}
                ]
            }]
        })
    );
}

#[tokio::test]
async fn test_empty_candidates_means_no_image() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(200, r#"{"candidates": []}"#);
    let handler = create_test_handler(transport);

    let reply = handler.handle(&Method::POST, PNG_REQUEST).await;

    assert_eq!(reply, error(StatusCode::INTERNAL_SERVER_ERROR, "No image returned from API"));
}

#[tokio::test]
async fn test_text_only_answer_means_no_image() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(200, r#"{
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "I can't edit images."}]},
            "finishReason": "STOP"
        }]
    }"#);
    let handler = create_test_handler(transport);

    let reply = handler.handle(&Method::POST, PNG_REQUEST).await;

    assert_eq!(reply, error(StatusCode::INTERNAL_SERVER_ERROR, "No image returned from API"));
}

#[tokio::test]
async fn test_blocked_prompt_means_no_image() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(200, r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#);
    let handler = create_test_handler(transport);

    let reply = handler.handle(&Method::POST, PNG_REQUEST).await;

    assert_eq!(reply, error(StatusCode::INTERNAL_SERVER_ERROR, "No image returned from API"));
}

#[tokio::test]
async fn test_transport_failure_message_is_relayed() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_error(TransportError::Connection("upstream down".to_string()));
    let handler = create_test_handler(transport);

    let reply = handler.handle(&Method::POST, PNG_REQUEST).await;

    assert_eq!(reply, error(StatusCode::INTERNAL_SERVER_ERROR, "upstream down"));
}

#[tokio::test]
async fn test_api_rejection_message_is_relayed() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(400, r#"{
        "error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}
    }"#);
    let handler = create_test_handler(transport);

    let reply = handler.handle(&Method::POST, PNG_REQUEST).await;

    assert_eq!(
        reply,
        error(StatusCode::INTERNAL_SERVER_ERROR, "API key not valid. Please pass a valid API key.")
    );
}

#[tokio::test]
async fn test_malformed_upstream_body_is_server_error() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(200, "<html>gateway</html>");
    let handler = create_test_handler(transport);

    let reply = handler.handle(&Method::POST, PNG_REQUEST).await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(matches!(reply.body, TransformResponse::Error { .. }));
}

#[tokio::test]
async fn test_validation_failures_never_reach_the_api() {
    let transport = Arc::new(MockHttpTransport::new());
    let handler = create_test_handler(transport.clone());

    let get = handler.handle(&Method::GET, PNG_REQUEST).await;
    assert_eq!(get, error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"));

    let missing = handler.handle(&Method::POST, br#"{"photo":"x"}"#).await;
    assert_eq!(missing, error(StatusCode::BAD_REQUEST, "No image provided"));

    let malformed = handler
        .handle(&Method::POST, br#"{"image":"data:image/png;base64,not base64!"}"#)
        .await;
    assert_eq!(
        malformed,
        error(StatusCode::BAD_REQUEST, "Invalid image data URL: payload is not valid base64")
    );

    transport.verify_request_count(0);
}

#[tokio::test]
async fn test_handler_without_key_reports_configuration_error() {
    let config = TransformConfig::builder().build().unwrap();
    let handler = TransformHandler::from_config(&config).unwrap();

    let reply = handler.handle(&Method::POST, PNG_REQUEST).await;

    assert_eq!(reply, error(StatusCode::INTERNAL_SERVER_ERROR, "API key not configured"));
}
