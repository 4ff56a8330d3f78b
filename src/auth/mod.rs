//! API key authentication for Gemini requests.

use crate::config::{AuthMethod, TransformConfig};
use crate::error::{ConfigurationError, GeminiError};
use secrecy::{ExposeSecret, SecretString};

/// Authentication manager for Gemini API.
pub trait AuthManager: Send + Sync {
    /// Get the authentication header name and value.
    fn get_auth_header(&self) -> Option<(String, String)>;

    /// Get the authentication query parameter.
    fn get_auth_query_param(&self) -> Option<(String, String)>;

    /// Clone the auth manager into a boxed trait object.
    fn clone_box(&self) -> Box<dyn AuthManager>;
}

impl Clone for Box<dyn AuthManager> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// API key authentication manager.
pub struct ApiKeyAuthManager {
    api_key: SecretString,
    auth_method: AuthMethod,
}

impl ApiKeyAuthManager {
    /// Create a new API key auth manager.
    pub fn new(api_key: SecretString, auth_method: AuthMethod) -> Self {
        Self { api_key, auth_method }
    }

    /// Create from config. Fails when no key is configured.
    pub fn from_config(config: &TransformConfig) -> Result<Self, GeminiError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(ConfigurationError::MissingApiKey)?;
        Ok(Self::new(api_key, config.auth_method))
    }
}

impl AuthManager for ApiKeyAuthManager {
    fn get_auth_header(&self) -> Option<(String, String)> {
        match self.auth_method {
            AuthMethod::Header => Some((
                "x-goog-api-key".to_string(),
                self.api_key.expose_secret().to_string(),
            )),
            AuthMethod::QueryParam => None,
        }
    }

    fn get_auth_query_param(&self) -> Option<(String, String)> {
        match self.auth_method {
            AuthMethod::QueryParam => Some((
                "key".to_string(),
                self.api_key.expose_secret().to_string(),
            )),
            AuthMethod::Header => None,
        }
    }

    fn clone_box(&self) -> Box<dyn AuthManager> {
        Box::new(Self {
            api_key: self.api_key.clone(),
            auth_method: self.auth_method,
        })
    }
}
