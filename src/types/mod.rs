//! Wire types for the Gemini `generateContent` API.

mod content;
mod generation;

pub use content::{Blob, Content, Part, Role};
pub use generation::{
    BlockReason, Candidate, FinishReason, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, Modality, PromptFeedback, UsageMetadata,
};
