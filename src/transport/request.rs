//! HTTP request builder for the Gemini API.
//!
//! Handles URL construction with the API version prefix, authentication via
//! the configured auth manager, and JSON body serialization.

use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;
use url::Url;

use crate::auth::AuthManager;
use crate::error::GeminiError;
use super::http::{HttpRequest, HttpMethod};

/// Builder for constructing HTTP requests to the Gemini API.
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: Url,
    api_version: String,
    auth_manager: Box<dyn AuthManager>,
}

impl RequestBuilder {
    /// Creates a new request builder.
    pub fn new(
        base_url: Url,
        api_version: String,
        auth_manager: Box<dyn AuthManager>,
    ) -> Self {
        Self {
            base_url,
            api_version,
            auth_manager,
        }
    }

    /// Builds a complete URL for the given path.
    ///
    /// `/models/x:generateContent` becomes
    /// `{base_url}/{api_version}/models/x:generateContent`, with `?key=` appended
    /// when query-parameter authentication is configured.
    pub fn build_url(&self, path: &str) -> Result<Url, GeminiError> {
        let path = path.trim_start_matches('/');
        let full_path = format!("{}/{}", self.api_version, path);

        let mut url = self.base_url.join(&full_path)?;

        if let Some((key, value)) = self.auth_manager.get_auth_query_param() {
            url.query_pairs_mut().append_pair(&key, &value);
        }

        Ok(url)
    }

    /// Builds an HTTP request with an optional JSON body.
    pub fn build_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&T>,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Result<HttpRequest, GeminiError> {
        let url = self.build_url(path)?;

        let mut headers = HashMap::new();

        if body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        if let Some((key, value)) = self.auth_manager.get_auth_header() {
            headers.insert(key, value);
        }

        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let body_bytes = match body {
            Some(body) => Some(Bytes::from(serde_json::to_vec(body)?)),
            None => None,
        };

        Ok(HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body: body_bytes,
        })
    }
}
