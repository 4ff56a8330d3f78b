//! Content service implementation issuing a single `generateContent` call.

use std::sync::Arc;
use std::time::Instant;
use async_trait::async_trait;

use super::ContentService;
use crate::auth::AuthManager;
use crate::error::{GeminiError, RequestError};
use crate::transport::{endpoints, HttpMethod, HttpTransport, RequestBuilder, ResponseParser};
use crate::types::{BlockReason, GenerateContentRequest, GenerateContentResponse};

/// Implementation of the ContentService.
pub struct ContentServiceImpl {
    transport: Arc<dyn HttpTransport>,
    request_builder: RequestBuilder,
}

impl ContentServiceImpl {
    /// Create a new content service implementation.
    pub fn new(
        base_url: url::Url,
        api_version: String,
        transport: Arc<dyn HttpTransport>,
        auth_manager: Box<dyn AuthManager>,
    ) -> Self {
        Self {
            transport,
            request_builder: RequestBuilder::new(base_url, api_version, auth_manager),
        }
    }

    /// Log prompt feedback the API attached to a response. A blocked prompt is
    /// not an error here: it simply yields no candidates.
    fn log_prompt_feedback(response: &GenerateContentResponse) {
        let Some(block_reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_ref())
        else {
            return;
        };

        match block_reason {
            BlockReason::Safety | BlockReason::Blocklist | BlockReason::ProhibitedContent => {
                tracing::warn!(block_reason = ?block_reason, "Prompt blocked by Gemini");
            }
            BlockReason::Other => {
                tracing::debug!(block_reason = ?block_reason, "Prompt blocked for non-safety reason");
            }
        }
    }
}

#[async_trait]
impl ContentService for ContentServiceImpl {
    async fn generate(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        if request.contents.is_empty() {
            return Err(RequestError::ValidationError {
                message: "contents must not be empty".to_string(),
            }
            .into());
        }

        let path = endpoints::generate_content(model);
        let http_request = self
            .request_builder
            .build_request(HttpMethod::Post, &path, Some(&request), None)?;

        let started = Instant::now();
        tracing::debug!(model, "Sending generateContent request");

        let http_response = self.transport.send(http_request).await?;
        let status = http_response.status;
        let response: GenerateContentResponse = ResponseParser::parse_response(http_response)?;

        let candidates = response.candidates.as_ref().map_or(0, Vec::len);
        tracing::info!(
            model,
            status,
            candidates,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "generateContent completed"
        );
        if let Some(usage) = &response.usage_metadata {
            tracing::debug!(
                prompt_tokens = usage.prompt_token_count,
                total_tokens = usage.total_token_count,
                "Token usage"
            );
        }
        Self::log_prompt_feedback(&response);

        Ok(response)
    }
}
