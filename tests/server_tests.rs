//! Tests of the axum router served on a local port.

use portrait_transform::mocks::MockImageGenerator;
use portrait_transform::server::{self, HEALTH_PATH, TRANSFORM_PATH};
use portrait_transform::TransformHandler;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Running test server
struct TestServer {
    base_url: String,
    client: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    async fn start(handler: TransformHandler, max_body_bytes: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel::<()>();

        let app = server::router(handler, max_body_bytes);
        let handle = tokio::spawn(server::serve_with_listener(listener, app, async move {
            rx.await.ok();
        }));

        Self {
            base_url,
            client: reqwest::Client::new(),
            shutdown: Some(tx),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
        drop(self.client);
        self.handle.await.unwrap().unwrap();
    }
}

async fn json_body(response: reqwest::Response) -> (u16, Value) {
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start(TransformHandler::new(None), 1024).await;

    let response = server.client.get(server.url(HEALTH_PATH)).send().await.unwrap();
    let (status, body) = json_body(response).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"ok": true, "service": "portrait-transform"}));
    server.stop().await;
}

#[tokio::test]
async fn test_get_on_transform_route_is_json_405() {
    let server = TestServer::start(TransformHandler::new(None), 1024).await;

    let response = server.client.get(server.url(TRANSFORM_PATH)).send().await.unwrap();
    let (status, body) = json_body(response).await;

    assert_eq!(status, 405);
    assert_eq!(body, json!({"error": "Method not allowed"}));
    server.stop().await;
}

#[tokio::test]
async fn test_post_round_trip() {
    let generator = Arc::new(MockImageGenerator::new());
    generator.enqueue_image("image/jpeg", "BBBB");
    let server = TestServer::start(TransformHandler::new(Some(generator.clone())), 1024 * 1024).await;

    let response = server
        .client
        .post(server.url(TRANSFORM_PATH))
        .json(&json!({"image": "data:image/png;base64,AAAA"}))
        .send()
        .await
        .unwrap();
    let (status, body) = json_body(response).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"image": "data:image/jpeg;base64,BBBB"}));
    assert_eq!(generator.call_count(), 1);
    server.stop().await;
}

#[tokio::test]
async fn test_missing_image_and_missing_key() {
    let server = TestServer::start(TransformHandler::new(None), 1024).await;

    let response = server
        .client
        .post(server.url(TRANSFORM_PATH))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(json_body(response).await, (400, json!({"error": "No image provided"})));

    let response = server
        .client
        .post(server.url(TRANSFORM_PATH))
        .json(&json!({"image": "data:image/png;base64,AAAA"}))
        .send()
        .await
        .unwrap();
    assert_eq!(json_body(response).await, (500, json!({"error": "API key not configured"})));

    server.stop().await;
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let generator = Arc::new(MockImageGenerator::new());
    let server = TestServer::start(TransformHandler::new(Some(generator.clone())), 64).await;

    let image = format!("data:image/png;base64,{}", "A".repeat(256));
    let response = server
        .client
        .post(server.url(TRANSFORM_PATH))
        .json(&json!({"image": image}))
        .send()
        .await
        .unwrap();

    assert_eq!(
        json_body(response).await,
        (413, json!({"error": "Request body exceeds 64 bytes"}))
    );
    assert_eq!(generator.call_count(), 0);
    server.stop().await;
}

#[tokio::test]
async fn test_method_is_checked_before_body_size() {
    let generator = Arc::new(MockImageGenerator::new());
    let server = TestServer::start(TransformHandler::new(Some(generator.clone())), 64).await;

    let oversized = format!(r#"{{"image":"data:image/png;base64,{}"}}"#, "A".repeat(256));
    for method in [reqwest::Method::GET, reqwest::Method::PUT, reqwest::Method::DELETE] {
        let response = server
            .client
            .request(method, server.url(TRANSFORM_PATH))
            .header("content-type", "application/json")
            .body(oversized.clone())
            .send()
            .await
            .unwrap();
        assert_eq!(json_body(response).await, (405, json!({"error": "Method not allowed"})));
    }

    assert_eq!(generator.call_count(), 0);
    server.stop().await;
}
