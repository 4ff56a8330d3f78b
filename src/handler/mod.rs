//! The portrait transform handler.

mod data_url;
mod generator;
mod prompt;
mod transform;

pub use data_url::{DataUrl, DataUrlError};
pub use generator::{GeminiImageGenerator, ImageGenerator};
pub use prompt::PORTRAIT_PROMPT;
pub use transform::{TransformHandler, TransformReply, TransformRequest, TransformResponse};
