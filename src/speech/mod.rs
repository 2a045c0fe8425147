//! Speech synthesis of the tutor's answer.
//!
//! ```text
//! answer ──▶ clean_for_speech ──▶ split_chunks (≤100 chars) ──▶ fetch each ──▶ one MP3
//! ```

mod google;
pub mod text_prep;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::SynthesisError;

pub use google::{GoogleTranslateSpeech, DEFAULT_SPEECH_BASE_URL};

/// MIME type of every synthesized artifact.
pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

/// A fully buffered spoken rendition of an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    /// MIME type of the audio container
    pub mime_type: String,
    /// Encoded audio
    pub bytes: Vec<u8>,
}

impl AudioArtifact {
    /// Wraps MP3 bytes.
    pub fn mp3(bytes: Vec<u8>) -> Self {
        Self {
            mime_type: AUDIO_MIME_TYPE.to_string(),
            bytes,
        }
    }
}

/// A text-to-audio backend speaking one fixed language.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Renders `text` as audio.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::EmptyText`] when there is nothing to speak,
    /// or another [`SynthesisError`] when the backend fails.
    async fn synthesize(&self, text: &str) -> Result<AudioArtifact, SynthesisError>;
}
