//! Uploads and the content normalizer.
//!
//! A submission arrives as loosely related inputs: at most one uploaded file,
//! a possibly empty typed question, and possibly a recorded voice clip.
//! [`normalize`] turns them into the prompt text and the ordered list of
//! [`ContentPart`]s that are forwarded to the reasoning service.
//!
//! ```text
//! Upload ──▶ Artifact ──┐
//! question ─────────────┼──▶ normalize ──▶ NormalizedInput { prompt, parts }
//! voice clip present? ──┘
//! ```

use image::ImageFormat;
use tracing::debug;

use crate::document;
use crate::error::TutorError;
use crate::persona::FALLBACK_PROMPT;

/// Prefix of the text part that carries an uploaded document's contents.
pub const DOCUMENT_PREFIX: &str = "Document contents: ";

/// Declared media type of PDF uploads.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A raw upload as supplied by the presentation layer.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Declared media type, e.g. `image/png`. Content is never sniffed.
    pub media_type: String,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Creates an upload from its declared media type and bytes.
    pub fn new(media_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads the upload into an [`Artifact`]: documents are text-extracted,
    /// images are decoded with their declared format to check they are sound.
    ///
    /// # Errors
    ///
    /// Returns [`TutorError::UnsupportedMediaType`], [`TutorError::DocumentRead`]
    /// or [`TutorError::ImageRead`], all of which are user errors.
    pub async fn into_artifact(self) -> Result<Artifact, TutorError> {
        let media_type = self.media_type.trim().to_ascii_lowercase();
        if media_type == PDF_MEDIA_TYPE {
            let text = document::extract_text(self.bytes).await?;
            return Ok(Artifact::Document(text));
        }

        let format = image_format(&media_type).ok_or(TutorError::UnsupportedMediaType {
            media_type: self.media_type.clone(),
        })?;
        let decoded = image::load_from_memory_with_format(&self.bytes, format).map_err(|e| {
            TutorError::ImageRead {
                detail: e.to_string(),
            }
        })?;
        debug!(
            width = decoded.width(),
            height = decoded.height(),
            "decoded uploaded image"
        );

        Ok(Artifact::Image(ImageData {
            mime_type: format.to_mime_type().to_string(),
            bytes: self.bytes,
        }))
    }
}

/// Maps an accepted image media type to its decoder format.
fn image_format(media_type: &str) -> Option<ImageFormat> {
    match media_type {
        "image/png" => Some(ImageFormat::Png),
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(ImageFormat::Jpeg),
        _ => None,
    }
}

/// An upload that has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// A document, already reduced to its text
    Document(String),
    /// An image, unaltered
    Image(ImageData),
}

/// An image forwarded to the reasoning service exactly as uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Canonical MIME type of the encoded image
    pub mime_type: String,
    /// Encoded image bytes
    pub bytes: Vec<u8>,
}

/// One typed unit of content. Order within a request is meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    /// A text part
    Text(String),
    /// An image part
    Image(ImageData),
}

/// A recorded voice clip.
///
/// Only its presence matters to the tutor; the bytes are echoed back for
/// playback and never forwarded to the reasoning service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    /// MIME type of the recording
    pub mime_type: String,
    /// Recorded bytes
    pub bytes: Vec<u8>,
}

impl AudioClip {
    /// Wraps a WAV recording, the format audio recorders hand over.
    pub fn wav(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            mime_type: "audio/wav".to_string(),
            bytes: bytes.into(),
        }
    }

    /// A clip with no bytes counts as no recording.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Output of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    /// The typed question, the fallback prompt, or empty
    pub prompt: String,
    /// Content parts in the order they are sent
    pub parts: Vec<ContentPart>,
}

/// Normalizes the inputs of one submission.
///
/// * A document becomes a leading text part, prefixed with [`DOCUMENT_PREFIX`].
/// * An image becomes an image part, unaltered.
/// * The prompt is the question when it is not empty; otherwise, if a voice
///   clip was recorded, it is [`FALLBACK_PROMPT`].
///
/// # Errors
///
/// Returns [`TutorError::EmptyInput`] when both the prompt and the parts end
/// up empty.
pub fn normalize(
    artifact: Option<Artifact>,
    question: &str,
    audio_provided: bool,
) -> Result<NormalizedInput, TutorError> {
    let mut parts = Vec::new();
    match artifact {
        Some(Artifact::Document(text)) => {
            parts.insert(0, ContentPart::Text(format!("{DOCUMENT_PREFIX}{text}")))
        }
        Some(Artifact::Image(image)) => parts.push(ContentPart::Image(image)),
        None => {}
    }

    let prompt = if !question.is_empty() {
        question.to_string()
    } else if audio_provided {
        FALLBACK_PROMPT.to_string()
    } else {
        String::new()
    };

    if prompt.is_empty() && parts.is_empty() {
        return Err(TutorError::EmptyInput);
    }

    Ok(NormalizedInput { prompt, parts })
}
