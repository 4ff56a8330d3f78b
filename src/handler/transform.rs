//! The transform endpoint's request-in, response-out logic.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::data_url::DataUrl;
use super::generator::{GeminiImageGenerator, ImageGenerator};
use super::prompt::PORTRAIT_PROMPT;
use crate::config::TransformConfig;
use crate::error::{GeminiError, TransformError};

/// Body accepted by the endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransformRequest {
    /// Source photo as a data URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// Body returned by the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TransformResponse {
    /// Transformed photo as a data URL.
    Image {
        /// `data:<mime>;base64,<payload>`.
        image: String,
    },
    /// Failure description.
    Error {
        /// Human-readable message.
        error: String,
    },
}

/// Status and body produced for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformReply {
    /// HTTP status code.
    pub status: StatusCode,
    /// JSON body.
    pub body: TransformResponse,
}

impl From<Result<DataUrl, TransformError>> for TransformReply {
    fn from(outcome: Result<DataUrl, TransformError>) -> Self {
        match outcome {
            Ok(image) => Self {
                status: StatusCode::OK,
                body: TransformResponse::Image { image: image.to_string() },
            },
            Err(err) => err.into(),
        }
    }
}

impl From<TransformError> for TransformReply {
    fn from(err: TransformError) -> Self {
        Self {
            status: err.status(),
            body: TransformResponse::Error { error: err.to_string() },
        }
    }
}

/// Validates requests and delegates the transformation to an `ImageGenerator`.
///
/// `generator` is `None` exactly when no API key is configured; such requests
/// fail with `API key not configured` after the request checks pass.
#[derive(Clone)]
pub struct TransformHandler {
    generator: Option<Arc<dyn ImageGenerator>>,
}

impl TransformHandler {
    /// Create a handler over an optional generator.
    pub fn new(generator: Option<Arc<dyn ImageGenerator>>) -> Self {
        Self { generator }
    }

    /// Create a handler wired to Gemini when the configuration has a key.
    pub fn from_config(config: &TransformConfig) -> Result<Self, GeminiError> {
        if !config.has_api_key() {
            tracing::warn!("GEMINI_API_KEY is not set; transform requests will fail");
            return Ok(Self::new(None));
        }
        let generator = GeminiImageGenerator::from_config(config)?;
        Ok(Self::new(Some(Arc::new(generator))))
    }

    /// Handle one request given its method and raw body.
    #[tracing::instrument(name = "transform", skip_all, fields(request_id = %Uuid::new_v4(), method = %method))]
    pub async fn handle(&self, method: &Method, body: &[u8]) -> TransformReply {
        let outcome = self.transform(method, body).await;

        match &outcome {
            Ok(image) => tracing::info!(mime_type = image.mime_type(), "Transform succeeded"),
            Err(err @ TransformError::Upstream(source)) => {
                tracing::error!(error = %source, message = %err, "Gemini API error");
            }
            Err(err @ (TransformError::ApiKeyNotConfigured | TransformError::NoImageReturned)) => {
                tracing::error!(error = %err, "Transform failed");
            }
            Err(err) => tracing::debug!(error = %err, "Rejected request"),
        }

        outcome.into()
    }

    async fn transform(&self, method: &Method, body: &[u8]) -> Result<DataUrl, TransformError> {
        if *method != Method::POST {
            return Err(TransformError::MethodNotAllowed);
        }

        let request = parse_body(body)?;
        let image = request
            .image
            .filter(|image| !image.is_empty())
            .ok_or(TransformError::MissingImage)?;

        let generator = self
            .generator
            .as_ref()
            .ok_or(TransformError::ApiKeyNotConfigured)?;

        let source = DataUrl::parse(&image)
            .map_err(|e| TransformError::InvalidDataUrl { reason: e.to_string() })?;
        tracing::debug!(
            mime_type = source.mime_type(),
            payload_len = source.payload().len(),
            "Forwarding image to generator"
        );

        generator
            .generate_image(PORTRAIT_PROMPT, &source)
            .await?
            .map(DataUrl::from)
            .ok_or(TransformError::NoImageReturned)
    }
}

/// An empty body counts as a request without an image.
fn parse_body(body: &[u8]) -> Result<TransformRequest, TransformError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(TransformRequest::default());
    }
    serde_json::from_slice(body).map_err(|_| TransformError::InvalidBody)
}
