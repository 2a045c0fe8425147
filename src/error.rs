//! Error types for the tutor pipeline.
//!
//! [`TutorError`] is what a submission can end with. Two nested enums keep
//! the failure detail of the two outbound calls apart:
//!
//! * [`ServiceError`] — the reasoning call failed (network, quota, timeout,
//!   malformed payload). Aborts the submission.
//! * [`SynthesisError`] — speech generation failed. Never aborts a submission
//!   that already has its text; it degrades to a text-only delivery.

use std::time::Duration;

use thiserror::Error;

/// Errors that can end (or degrade) a single tutoring submission.
#[derive(Debug, Error)]
pub enum TutorError {
    /// Nothing usable was submitted: no upload, no question, no voice clip.
    #[error("Please upload a file or type a question.")]
    EmptyInput,

    /// The uploaded document could not be read as a page-oriented document.
    #[error("Could not read the uploaded document: {detail}")]
    DocumentRead {
        /// What the extractor reported
        detail: String,
    },

    /// The uploaded image could not be decoded with its declared format.
    #[error("Could not read the uploaded image: {detail}")]
    ImageRead {
        /// What the decoder reported
        detail: String,
    },

    /// The upload carries a media type the tutor does not accept.
    #[error("Unsupported upload type '{media_type}'. Upload a PNG, JPEG or PDF file.")]
    UnsupportedMediaType {
        /// The declared media type
        media_type: String,
    },

    /// The credential is missing or was rejected by the reasoning service.
    #[error("A valid API key is required: {detail}")]
    Auth {
        /// Why the credential was refused
        detail: String,
    },

    /// The reasoning call failed.
    #[error("The tutor service failed: {0}")]
    Service(#[from] ServiceError),

    /// The reasoning service answered without any usable text.
    #[error("The tutor service returned an empty answer{}", reason_suffix(.reason))]
    EmptyResponse {
        /// Finish or block reason reported by the service, if any
        reason: Option<String>,
    },

    /// Speech generation failed.
    #[error("Speech synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    /// Configuration could not be loaded.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TutorError {
    /// Returns `true` for errors the user can fix by changing their input.
    ///
    /// These are shown as guidance rather than as failures.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput
                | Self::DocumentRead { .. }
                | Self::ImageRead { .. }
                | Self::UnsupportedMediaType { .. }
                | Self::Auth { .. }
        )
    }
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(" ({r})"))
        .unwrap_or_default()
}

/// Failures of the reasoning call.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The call did not complete within the configured bound.
    #[error("request timed out after {limit:?}")]
    Timeout {
        /// The bound that was exceeded
        limit: Duration,
    },

    /// The service answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as returned
        body: String,
    },

    /// Transport-level failure.
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("JSON parsing error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures of speech generation.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// There was nothing to speak.
    #[error("no text to speak")]
    EmptyText,

    /// The synthesis did not complete within the configured bound.
    #[error("speech request timed out after {limit:?}")]
    Timeout {
        /// The bound that was exceeded
        limit: Duration,
    },

    /// The speech backend answered with a non-success status.
    #[error("speech request failed with status {status} on chunk {chunk}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Zero-based index of the failing text chunk
        chunk: usize,
    },

    /// Transport-level failure.
    #[error("speech request failed: {0}")]
    Request(#[from] reqwest::Error),
}
