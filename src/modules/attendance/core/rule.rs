// Rule book entry with an optional inline image.
//
// Purpose
// - A titled rule with a description, stamped once at creation.
//
// Notes
// - The image travels inside the document as a base64 `data:` URL, never as a separate file.
// - `created_at` is epoch milliseconds and is never rewritten.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<RuleImage>,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleImageError {
    #[error("image is not a base64 data URL")]
    NotADataUrl,

    #[error("image payload is not valid base64: {0}")]
    InvalidBase64(String),
}

impl RuleImage {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, B64.encode(&self.bytes))
    }

    pub fn from_data_url(url: &str) -> Result<Self, RuleImageError> {
        let rest = url.strip_prefix("data:").ok_or(RuleImageError::NotADataUrl)?;
        let (mime_type, payload) = rest
            .split_once(";base64,")
            .ok_or(RuleImageError::NotADataUrl)?;
        let bytes = B64
            .decode(payload.trim())
            .map_err(|e| RuleImageError::InvalidBase64(e.to_string()))?;
        Ok(Self::new(mime_type, bytes))
    }
}

impl TryFrom<String> for RuleImage {
    type Error = RuleImageError;

    fn try_from(url: String) -> Result<Self, Self::Error> {
        Self::from_data_url(&url)
    }
}

impl From<RuleImage> for String {
    fn from(image: RuleImage) -> Self {
        image.to_data_url()
    }
}
