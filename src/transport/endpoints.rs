//! Endpoint paths for the Gemini API.

/// Base path for models endpoints.
pub const MODELS: &str = "/models";

/// Constructs the generateContent path for a model.
///
/// # Example
///
/// ```
/// use portrait_transform::transport::endpoints;
///
/// let path = endpoints::generate_content("gemini-2.0-flash-exp");
/// assert_eq!(path, "/models/gemini-2.0-flash-exp:generateContent");
/// ```
pub fn generate_content(model: &str) -> String {
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!("{MODELS}/{model}:generateContent")
}
