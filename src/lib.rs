//! # Portrait Transform
//!
//! HTTP service that turns a photo into a professional profile portrait using
//! the Google Gemini generative-image API.
//!
//! A single endpoint accepts `{ "image": "data:<mime>;base64,<payload>" }`,
//! forwards the photo with a fixed instruction to `generateContent`, and
//! answers `{ "image": "<data url>" }` or `{ "error": "<message>" }`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use portrait_transform::{server, TransformConfig, TransformHandler};
//! use secrecy::SecretString;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TransformConfig::builder()
//!         .api_key(SecretString::new("your-api-key".into()))
//!         .build()?;
//!
//!     let handler = TransformHandler::from_config(&config)?;
//!     let app = server::router(handler, config.max_body_bytes);
//!     let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `config` - Configuration types, builder and environment loading
//! - `auth` - API key management
//! - `transport` - HTTP transport layer
//! - `error` - Error types and taxonomy
//! - `types` - Gemini wire types (Content, Part, Blob, ...)
//! - `services` - `generateContent` service
//! - `handler` - Data URL parsing and the transform handler
//! - `server` - axum router and server loop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod server;
pub mod services;
pub mod transport;
pub mod types;

// Testing support - always available for integration tests
pub mod mocks;

pub use auth::{ApiKeyAuthManager, AuthManager};
pub use config::{
    AuthMethod, TransformConfig, TransformConfigBuilder, DEFAULT_API_VERSION, DEFAULT_BASE_URL,
    DEFAULT_MODEL,
};
pub use error::{GeminiError, GeminiResult, TransformError};
pub use handler::{
    DataUrl, DataUrlError, GeminiImageGenerator, ImageGenerator, TransformHandler,
    TransformReply, TransformRequest, TransformResponse, PORTRAIT_PROMPT,
};
pub use services::{ContentService, ContentServiceImpl};
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::{Blob, GenerateContentRequest, GenerateContentResponse};
