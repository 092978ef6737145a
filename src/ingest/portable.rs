//! # Portable Image Encoding
//!
//! A [`PortableImage`] is a `data:<mime>;base64,<payload>` string: the image
//! bytes plus their type tag in one self-describing value that can be stored,
//! compared, or handed to a profile field as plain text. The empty string is
//! the "no image set" value.

use std::fmt;

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// MIME used when the host gives no type hint.
pub const FALLBACK_MIME: &str = "application/octet-stream";

const BASE64_MARKER: &str = ";base64";

/// Immutable data URI holding one image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortableImage(String);

impl PortableImage {
    /// Encode raw bytes under the given MIME type. An empty `mime` falls back
    /// to [`FALLBACK_MIME`].
    pub fn encode(mime: &str, bytes: &[u8]) -> Self {
        let mime = if mime.trim().is_empty() {
            FALLBACK_MIME
        } else {
            mime.trim()
        };
        let payload = general_purpose::STANDARD.encode(bytes);
        Self(format!("data:{mime}{BASE64_MARKER},{payload}"))
    }

    /// The "no image" value handed to a form when a slot is cleared.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Wrap an existing data URI after checking its shape. The empty string
    /// is accepted as [`PortableImage::empty`].
    pub fn parse(uri: impl Into<String>) -> Result<Self, DecodeError> {
        let image = Self(uri.into());
        if !image.is_empty() {
            image.split()?;
        }
        Ok(image)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// MIME tag without parameters, e.g. `image/png`.
    pub fn mime(&self) -> Option<&str> {
        self.split().ok().map(|(mime, _)| mime)
    }

    /// Length of the encoded string in bytes.
    pub fn encoded_len(&self) -> usize {
        self.0.len()
    }

    /// Decode the base64 payload back into the original bytes.
    pub fn decode_payload(&self) -> Result<Vec<u8>, DecodeError> {
        let (_, payload) = self.split()?;
        Ok(general_purpose::STANDARD.decode(payload)?)
    }

    fn split(&self) -> Result<(&str, &str), DecodeError> {
        let rest = self
            .0
            .strip_prefix("data:")
            .ok_or_else(|| DecodeError::MalformedUri("missing 'data:' scheme".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| DecodeError::MalformedUri("missing ',' separator".into()))?;
        let header = header
            .strip_suffix(BASE64_MARKER)
            .ok_or_else(|| DecodeError::MalformedUri("payload is not base64".into()))?;
        let mime = header.split(';').next().unwrap_or_default();
        Ok((mime, payload))
    }
}

impl fmt::Display for PortableImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PortableImage> for String {
    fn from(image: PortableImage) -> Self {
        image.0
    }
}
