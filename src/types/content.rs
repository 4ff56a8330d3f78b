//! Content-related types for the Gemini API.

use serde::{Deserialize, Serialize};

/// A part of a content message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
    /// Inline binary data.
    InlineData {
        /// The inline data blob.
        #[serde(rename = "inlineData", alias = "inline_data")]
        inline_data: Blob,
    },
    /// Any part kind this service does not interpret.
    Other(serde_json::Value),
}

impl Part {
    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Creates an inline data part.
    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: Blob {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }

    /// The inline blob carried by this part, if any.
    pub fn as_inline_data(&self) -> Option<&Blob> {
        match self {
            Part::InlineData { inline_data } => Some(inline_data),
            _ => None,
        }
    }
}

/// Binary data blob with MIME type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// The MIME type of the data.
    #[serde(alias = "mime_type")]
    pub mime_type: String,
    /// Base64-encoded binary data.
    pub data: String,
}

/// A content message with a role and parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    /// The role of the content author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// The parts of the content.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Creates user content from parts.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some(Role::User),
            parts,
        }
    }
}

/// The role of a message author.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User role.
    User,
    /// Model role.
    Model,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_inline_part_serializes_camel_case() {
        let part = Part::inline("image/png", "AAAA");
        assert_eq!(
            serde_json::to_value(&part).unwrap(),
            json!({"inlineData": {"mimeType": "image/png", "data": "AAAA"}})
        );
    }

    #[test]
    fn test_inline_part_accepts_snake_case() {
        let part: Part = serde_json::from_value(json!({
            "inline_data": {"mime_type": "image/jpeg", "data": "BBBB"}
        }))
        .unwrap();
        assert_eq!(part.as_inline_data().unwrap().mime_type, "image/jpeg");
    }

    #[test]
    fn test_unknown_part_is_preserved() {
        let part: Part = serde_json::from_value(json!({"functionCall": {"name": "f", "args": {}}})).unwrap();
        assert!(matches!(part, Part::Other(_)));
        assert!(part.as_inline_data().is_none());
    }
}
