//! Error types for the Gemini client and the transform handler.

mod types;
mod categories;
mod mapper;
mod transform;

pub use types::*;
pub use categories::*;
pub use mapper::*;
pub use transform::*;
