#![deny(missing_docs)]

//! A homework tutor on top of the Google Gemini AI API.
//!
//! A learner submits a question, an uploaded exercise (PDF, PNG or JPEG), a
//! voice recording, or any mix of them. The tutor turns the submission into
//! one multimodal request, asks Gemini for a guide-don't-solve explanation
//! and speaks the answer back as MP3.
//!
//! ```no_run
//! use gemini_tutor::{Credential, Submission, Tutor, TutorConfig};
//!
//! # async fn run() -> Result<(), gemini_tutor::TutorError> {
//! let config = TutorConfig::load()?;
//! let tutor = Tutor::from_config(&config, Credential::from_env())?;
//! let outcome = tutor.submit(Submission::question("What is photosynthesis?")).await;
//! println!("{:?}", outcome.stage());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod content;
pub mod credential;
pub mod document;
pub mod error;
pub mod models;
pub mod persona;
pub mod reasoning;
pub mod speech;
pub mod tutor;

pub use client::GenerativeModel;
pub use config::TutorConfig;
pub use content::{AudioClip, ContentPart, Upload};
pub use credential::Credential;
pub use error::{ServiceError, SynthesisError, TutorError};
pub use persona::PersonaDirective;
pub use reasoning::{ReasoningService, TutorRequest};
pub use speech::{AudioArtifact, GoogleTranslateSpeech, SpeechService};
pub use tutor::{Delivery, Outcome, Report, Stage, Submission, Trigger, Tutor};
