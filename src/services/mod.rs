//! Services built on top of the Gemini transport.

pub mod content;

pub use content::{ContentService, ContentServiceImpl};
