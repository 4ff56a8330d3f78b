//! HTTP surface: the transform route and a health check.

use axum::{
    body,
    extract::{Request, State},
    http::Method,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::TransformConfig;
use crate::error::TransformError;
use crate::handler::{TransformHandler, TransformReply};

/// Path of the transform endpoint.
pub const TRANSFORM_PATH: &str = "/api/transform";

/// Path of the health check.
pub const HEALTH_PATH: &str = "/healthz";

#[derive(Clone)]
struct AppState {
    handler: TransformHandler,
    max_body_bytes: usize,
}

#[derive(Serialize)]
struct Health {
    ok: bool,
    service: &'static str,
}

impl IntoResponse for TransformReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// Every method is routed here so that non-POST gets the JSON 405 body.
// The body is only buffered once the method has been accepted.
async fn transform(State(state): State<AppState>, request: Request) -> TransformReply {
    let method = request.method().clone();
    if method != Method::POST {
        return state.handler.handle(&method, &[]).await;
    }

    match body::to_bytes(request.into_body(), state.max_body_bytes).await {
        Ok(bytes) => state.handler.handle(&method, &bytes).await,
        Err(e) => {
            tracing::debug!(error = %e, limit = state.max_body_bytes, "Failed to read request body");
            TransformError::BodyTooLarge { limit: state.max_body_bytes }.into()
        }
    }
}

async fn health() -> Json<Health> {
    Json(Health { ok: true, service: "portrait-transform" })
}

/// Build the application router around `handler`.
///
/// Transform bodies larger than `max_body_bytes` are answered with a JSON 413.
pub fn router(handler: TransformHandler, max_body_bytes: usize) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(TRANSFORM_PATH, any(transform))
        .with_state(AppState { handler, max_body_bytes })
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_with_listener<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Bind `config.bind_addr` and serve until Ctrl-C.
pub async fn serve(config: TransformConfig) -> anyhow::Result<()> {
    let handler = TransformHandler::from_config(&config)?;
    let app = router(handler, config.max_body_bytes);

    let listener = TcpListener::bind(config.bind_addr).await?;
    serve_with_listener(listener, app, shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
