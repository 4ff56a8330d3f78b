//! Configuration types for the portrait transform service.

use secrecy::SecretString;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;
use crate::error::{GeminiError, ConfigurationError};
use crate::types::Modality;

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default API version.
pub const DEFAULT_API_VERSION: &str = "v1beta";

/// Default image-capable model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Default request timeout (120 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default connect timeout (30 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default request body limit (25 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Authentication method for API key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AuthMethod {
    /// Use x-goog-api-key header (recommended).
    #[default]
    Header,
    /// Use ?key= query parameter.
    QueryParam,
}

/// Configuration for the transform service and its Gemini client.
///
/// The API key is optional on purpose: a missing key is reported per request
/// as `500 API key not configured` rather than refusing to start.
#[derive(Clone, Debug)]
pub struct TransformConfig {
    /// API key, if configured.
    pub api_key: Option<SecretString>,
    /// Model used for the transformation.
    pub model: String,
    /// Base URL for the API.
    pub base_url: Url,
    /// API version.
    pub api_version: String,
    /// Default timeout for requests.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Authentication method.
    pub auth_method: AuthMethod,
    /// Output modalities requested from the model. Empty means unset.
    pub response_modalities: Vec<Modality>,
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
    /// Maximum accepted request body size.
    pub max_body_bytes: usize,
}

impl TransformConfig {
    /// Create a new configuration builder.
    pub fn builder() -> TransformConfigBuilder {
        TransformConfigBuilder::default()
    }

    /// Returns true when an API key is present.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, GeminiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GeminiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(api_key) = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("GOOGLE_API_KEY"))
            .filter(|key| !key.trim().is_empty())
        {
            builder = builder.api_key(SecretString::new(api_key));
        }

        if let Some(model) = lookup("GEMINI_MODEL") {
            builder = builder.model(&model);
        }

        if let Some(base_url) = lookup("GEMINI_BASE_URL") {
            builder = builder.base_url(&base_url)?;
        }

        if let Some(version) = lookup("GEMINI_API_VERSION") {
            builder = builder.api_version(&version);
        }

        if let Some(secs) = parse_var::<u64>(&lookup, "GEMINI_TIMEOUT_SECS")? {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(list) = lookup("GEMINI_RESPONSE_MODALITIES") {
            let modalities = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse)
                .collect::<Result<Vec<Modality>, _>>()?;
            builder = builder.response_modalities(modalities);
        }

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_var::<u16>(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT);
        let bind_addr: SocketAddr = format!("{host}:{port}").parse().map_err(|_| {
            ConfigurationError::InvalidConfiguration {
                message: format!("invalid bind address {host}:{port}"),
            }
        })?;
        builder = builder.bind_addr(bind_addr);

        if let Some(limit) = parse_var::<usize>(&lookup, "MAX_BODY_BYTES")? {
            builder = builder.max_body_bytes(limit);
        }

        builder.build()
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, GeminiError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            GeminiError::Configuration(ConfigurationError::InvalidConfiguration {
                message: format!("{key} has an invalid value: {raw}"),
            })
        }),
    }
}

/// Builder for TransformConfig.
#[derive(Default)]
pub struct TransformConfigBuilder {
    api_key: Option<SecretString>,
    model: Option<String>,
    base_url: Option<Url>,
    api_version: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    auth_method: Option<AuthMethod>,
    response_modalities: Option<Vec<Modality>>,
    bind_addr: Option<SocketAddr>,
    max_body_bytes: Option<usize>,
}

impl TransformConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: &str) -> Result<Self, GeminiError> {
        self.base_url = Some(Url::parse(base_url)?);
        Ok(self)
    }

    /// Set the API version.
    pub fn api_version(mut self, version: &str) -> Self {
        self.api_version = Some(version.to_string());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the authentication method.
    pub fn auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Set the response modalities sent in the generation config.
    pub fn response_modalities(mut self, modalities: Vec<Modality>) -> Self {
        self.response_modalities = Some(modalities);
        self
    }

    /// Set the listen address.
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = Some(addr);
        self
    }

    /// Set the maximum request body size.
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = Some(limit);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<TransformConfig, GeminiError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let model = self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model.trim().is_empty() {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "model name must not be empty".to_string(),
            }
            .into());
        }

        Ok(TransformConfig {
            api_key: self.api_key,
            model,
            base_url,
            api_version: self.api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            timeout: self.timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            auth_method: self.auth_method.unwrap_or_default(),
            response_modalities: self.response_modalities.unwrap_or_default(),
            bind_addr: self
                .bind_addr
                .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))),
            max_body_bytes: self.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES),
        })
    }
}
