//! The image generation seam between the handler and Gemini.

use std::sync::Arc;
use async_trait::async_trait;

use super::data_url::DataUrl;
use crate::auth::{ApiKeyAuthManager, AuthManager};
use crate::config::TransformConfig;
use crate::error::{GeminiError, NetworkError};
use crate::services::{ContentService, ContentServiceImpl};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{Blob, Content, GenerateContentRequest, GenerationConfig, Part};

/// Produces a transformed image from a prompt and a source image.
///
/// `Ok(None)` means the model answered without inline image data.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Run one generation for `image` under `prompt`.
    async fn generate_image(&self, prompt: &str, image: &DataUrl) -> Result<Option<Blob>, GeminiError>;
}

/// `ImageGenerator` backed by Gemini `generateContent`.
pub struct GeminiImageGenerator {
    service: Arc<dyn ContentService>,
    model: String,
    generation_config: Option<GenerationConfig>,
}

impl GeminiImageGenerator {
    /// Create a generator over an existing content service.
    pub fn new(service: Arc<dyn ContentService>, model: impl Into<String>) -> Self {
        Self {
            service,
            model: model.into(),
            generation_config: None,
        }
    }

    /// Set the generation config sent with every request.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    /// Build the generator with a reqwest transport from configuration.
    ///
    /// Fails with `ConfigurationError::MissingApiKey` when no key is set.
    pub fn from_config(config: &TransformConfig) -> Result<Self, GeminiError> {
        let transport = ReqwestTransport::new(config.timeout, config.connect_timeout)
            .map_err(|e| NetworkError::ConnectionFailed { message: e.to_string() })?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Build the generator over a caller-supplied transport.
    pub fn with_transport(
        config: &TransformConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, GeminiError> {
        let auth_manager: Box<dyn AuthManager> = Box::new(ApiKeyAuthManager::from_config(config)?);
        let service = ContentServiceImpl::new(
            config.base_url.clone(),
            config.api_version.clone(),
            transport,
            auth_manager,
        );

        let mut generator = Self::new(Arc::new(service), config.model.clone());
        if !config.response_modalities.is_empty() {
            generator = generator.with_generation_config(GenerationConfig {
                response_modalities: Some(config.response_modalities.clone()),
            });
        }
        Ok(generator)
    }

    fn build_request(&self, prompt: &str, image: &DataUrl) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::text(prompt),
                Part::inline(image.mime_type(), image.payload()),
            ])],
            generation_config: self.generation_config.clone(),
        }
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageGenerator {
    async fn generate_image(&self, prompt: &str, image: &DataUrl) -> Result<Option<Blob>, GeminiError> {
        let request = self.build_request(prompt, image);
        let response = self.service.generate(&self.model, request).await?;
        Ok(response.first_inline_data().cloned())
    }
}
