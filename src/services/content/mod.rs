//! Content generation service for Gemini API.

mod service;

use async_trait::async_trait;
use crate::error::GeminiError;
use crate::types::{GenerateContentRequest, GenerateContentResponse};

pub use service::ContentServiceImpl;

/// Service for content generation with Gemini models.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Generate content (non-streaming).
    async fn generate(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError>;
}
