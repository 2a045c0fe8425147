//! Part model used in both requests and responses.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::content::{ContentPart, ImageData};

/// One part of a content turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// A text part containing a string value
    Text {
        /// The text content of the part
        text: String,
    },
    /// A part containing inline data
    InlineData {
        /// The inline data content of the part
        #[serde(alias = "inlineData")]
        inline_data: InlineData,
    },
    /// Any other part kind, kept as raw JSON
    Other(serde_json::Value),
}

impl Part {
    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Returns the text of a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::InlineData { .. } | Self::Other(_) => None,
        }
    }
}

impl From<&ImageData> for Part {
    fn from(image: &ImageData) -> Self {
        Self::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type.clone(),
                data: STANDARD.encode(&image.bytes),
            },
        }
    }
}

impl From<&ContentPart> for Part {
    fn from(part: &ContentPart) -> Self {
        match part {
            ContentPart::Text(text) => Self::text(text.clone()),
            ContentPart::Image(image) => Self::from(image),
        }
    }
}

/// Base64-encoded bytes with their MIME type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineData {
    /// The MIME type of the inline data
    #[serde(alias = "mimeType")]
    pub mime_type: String,
    /// The base64-encoded data
    pub data: String,
}
