//! `data:<mime>;base64,<payload>` parsing and formatting.

use std::fmt;

use base64::Engine as _;
use thiserror::Error;

use crate::types::Blob;

/// Structural problems found in a data URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("missing ',' between metadata and payload")]
    MissingSeparator,

    #[error("must start with 'data:'")]
    MissingScheme,

    #[error("missing mime type")]
    MissingMimeType,

    #[error("invalid mime type '{0}'")]
    InvalidMimeType(String),

    #[error("'{0}' is not an image type")]
    NotAnImage(String),

    #[error("payload must be base64 encoded")]
    NotBase64,

    #[error("empty payload")]
    EmptyPayload,

    #[error("payload is not valid base64")]
    InvalidPayload,
}

/// A parsed base64 data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime_type: String,
    payload: String,
}

impl DataUrl {
    /// Builds a data URL from parts without validation.
    pub fn new(mime_type: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload: payload.into(),
        }
    }

    /// Parses and validates `data:<image mime>;base64,<payload>`.
    ///
    /// The payload is everything after the first comma; the mime type is the
    /// text between `data:` and the first `;`.
    pub fn parse(input: &str) -> Result<Self, DataUrlError> {
        let (meta, payload) = input.split_once(',').ok_or(DataUrlError::MissingSeparator)?;

        let meta = strip_prefix_ignore_case(meta.trim_start(), "data:")
            .ok_or(DataUrlError::MissingScheme)?;

        let mut segments = meta.split(';');
        let mime_type = segments.next().unwrap_or_default().trim();
        if mime_type.is_empty() {
            return Err(DataUrlError::MissingMimeType);
        }

        let parsed: mime::Mime = mime_type
            .parse()
            .map_err(|_| DataUrlError::InvalidMimeType(mime_type.to_string()))?;
        if parsed.type_() != mime::IMAGE {
            return Err(DataUrlError::NotAnImage(mime_type.to_string()));
        }

        if !segments.any(|param| param.trim().eq_ignore_ascii_case("base64")) {
            return Err(DataUrlError::NotBase64);
        }

        if payload.is_empty() {
            return Err(DataUrlError::EmptyPayload);
        }
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|_| DataUrlError::InvalidPayload)?;

        Ok(Self::new(mime_type, payload))
    }

    /// The declared mime type, e.g. `image/png`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 payload without the metadata prefix.
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.payload)
    }
}

impl From<Blob> for DataUrl {
    fn from(blob: Blob) -> Self {
        Self::new(blob.mime_type, blob.data)
    }
}
