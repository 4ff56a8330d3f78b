//! Fixed instruction sent with every photo.

/// Instruction describing the portrait transformation.
pub const PORTRAIT_PROMPT: &str = "Transform this photo into a professional LinkedIn profile picture:
- Convert to black and white
- Enhance lighting and contrast
- Clean/neutral background
- Professional look
- Keep the person's face clear and centered

Return the transformed image.";
