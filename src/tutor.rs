//! The orchestrator: one submission in, one [`Outcome`] out.
//!
//! ```text
//! Idle ──▶ Validating ──▶ Reasoning ──▶ Synthesizing ──▶ Delivered
//!              │              │               │
//!              └──────────────┴──▶ Reported   └──▶ Delivered (text only)
//! ```
//!
//! The tutor holds no memory between submissions. The reasoning call is made
//! exactly once per submission; speech only runs after it succeeded, and a
//! speech failure never discards the text.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::client::GenerativeModel;
use crate::config::TutorConfig;
use crate::content::{normalize, AudioClip, Upload};
use crate::credential::Credential;
use crate::error::{ServiceError, SynthesisError, TutorError};
use crate::persona::PersonaDirective;
use crate::reasoning::{ReasoningService, TutorRequest};
use crate::speech::{AudioArtifact, GoogleTranslateSpeech, SpeechService};

/// Where a submission is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Waiting for a submission
    Idle,
    /// Reading the upload and normalizing the inputs
    Validating,
    /// Waiting on the reasoning service
    Reasoning,
    /// Waiting on the speech service
    Synthesizing,
    /// An answer was delivered, with or without audio
    Delivered,
    /// The submission ended with an error
    Reported,
}

/// What started a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The learner asked explicitly
    Submit,
    /// A voice recording just finished
    AudioCaptured,
}

/// Everything the learner supplied for one question.
#[derive(Debug, Clone)]
pub struct Submission {
    /// The uploaded file, if any
    pub upload: Option<Upload>,
    /// The typed question, possibly empty
    pub question: String,
    /// The recorded voice clip, if any
    pub voice: Option<AudioClip>,
    /// What started this submission
    pub trigger: Trigger,
}

impl Submission {
    /// An explicit submission of a typed question and nothing else.
    pub fn question(question: impl Into<String>) -> Self {
        Self {
            upload: None,
            question: question.into(),
            voice: None,
            trigger: Trigger::Submit,
        }
    }

    fn has_voice(&self) -> bool {
        self.voice.as_ref().is_some_and(|clip| !clip.is_empty())
    }
}

/// A successful answer.
#[derive(Debug)]
pub struct Delivery {
    /// The tutor's explanation
    pub text: String,
    /// The spoken explanation, absent when speech failed
    pub audio: Option<AudioArtifact>,
    /// Why `audio` is absent, if it is
    pub warning: Option<TutorError>,
    /// The learner's own recording, echoed back for playback
    pub voice_clip: Option<AudioClip>,
}

/// A submission that ended without an answer.
#[derive(Debug)]
pub struct Report {
    /// What went wrong
    pub error: TutorError,
    /// The learner's own recording, echoed back for playback
    pub voice_clip: Option<AudioClip>,
}

/// The terminal result of one submission.
#[derive(Debug)]
pub enum Outcome {
    /// The trigger did not start a submission
    Ignored,
    /// An answer was produced
    Delivered(Delivery),
    /// The submission failed
    Reported(Report),
}

impl Outcome {
    /// The stage the submission ended in.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Ignored => Stage::Idle,
            Self::Delivered(_) => Stage::Delivered,
            Self::Reported(_) => Stage::Reported,
        }
    }

    /// The error that ended the submission, if it failed.
    pub fn error(&self) -> Option<&TutorError> {
        match self {
            Self::Reported(report) => Some(&report.error),
            _ => None,
        }
    }
}

/// Drives submissions through validation, reasoning and speech.
#[derive(Debug)]
pub struct Tutor<R, S> {
    reasoning: R,
    speech: S,
    credential: Option<Credential>,
    persona: PersonaDirective,
    reasoning_timeout: Duration,
    speech_timeout: Duration,
}

impl Tutor<GenerativeModel, GoogleTranslateSpeech> {
    /// Creates a tutor backed by the hosted Gemini and speech services.
    ///
    /// # Arguments
    ///
    /// * `config` - Model, endpoints, language and timeouts
    /// * `credential` - The API key; when absent every submission reports
    ///   [`TutorError::Auth`]
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(
        config: &TutorConfig,
        credential: Option<Credential>,
    ) -> Result<Self, TutorError> {
        let reasoning = GenerativeModel::from_config(config)?;
        let speech = GoogleTranslateSpeech::from_config(config)?;
        Ok(Self::new(reasoning, speech, credential)
            .with_persona(PersonaDirective::for_language(&config.language))
            .with_timeouts(
                Duration::from_secs(config.reasoning_timeout_secs),
                Duration::from_secs(config.speech_timeout_secs),
            ))
    }
}

impl<R: ReasoningService, S: SpeechService> Tutor<R, S> {
    /// Creates a tutor over the given services with the default persona and
    /// timeouts.
    pub fn new(reasoning: R, speech: S, credential: Option<Credential>) -> Self {
        let defaults = TutorConfig::default();
        Self {
            reasoning,
            speech,
            credential,
            persona: PersonaDirective::default(),
            reasoning_timeout: Duration::from_secs(defaults.reasoning_timeout_secs),
            speech_timeout: Duration::from_secs(defaults.speech_timeout_secs),
        }
    }

    /// Replaces the persona.
    pub fn with_persona(mut self, persona: PersonaDirective) -> Self {
        self.persona = persona;
        self
    }

    /// Replaces the bounds on the reasoning and speech calls.
    pub fn with_timeouts(mut self, reasoning: Duration, speech: Duration) -> Self {
        self.reasoning_timeout = reasoning;
        self.speech_timeout = speech;
        self
    }

    /// Whether a credential is held. Without one the tutor only reports.
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Runs one submission to its terminal stage.
    pub async fn submit(&self, submission: Submission) -> Outcome {
        if submission.trigger == Trigger::AudioCaptured && !submission.question.is_empty() {
            info!("voice clip captured while a question is typed; waiting for submit");
            return Outcome::Ignored;
        }

        let audio_provided = submission.has_voice();
        let Submission {
            upload,
            question,
            voice,
            ..
        } = submission;

        let text = match self.answer(upload, &question, audio_provided).await {
            Ok(text) => text,
            Err(error) => {
                if error.is_user_error() {
                    warn!(stage = ?Stage::Reported, %error, "submission needs attention");
                } else {
                    warn!(stage = ?Stage::Reported, %error, "submission failed");
                }
                return Outcome::Reported(Report {
                    error,
                    voice_clip: voice,
                });
            }
        };

        info!(stage = ?Stage::Synthesizing, chars = text.chars().count(), "speaking answer");
        let (audio, warning) = match self.speak(&text).await {
            Ok(audio) => (Some(audio), None),
            Err(error) => {
                warn!(%error, "delivering text without audio");
                (None, Some(TutorError::Synthesis(error)))
            }
        };

        info!(stage = ?Stage::Delivered, audio = audio.is_some(), "answer delivered");
        Outcome::Delivered(Delivery {
            text,
            audio,
            warning,
            voice_clip: voice,
        })
    }

    async fn answer(
        &self,
        upload: Option<Upload>,
        question: &str,
        audio_provided: bool,
    ) -> Result<String, TutorError> {
        let credential = self.credential.as_ref().ok_or_else(|| TutorError::Auth {
            detail: "no API key was provided".into(),
        })?;

        info!(
            stage = ?Stage::Validating,
            upload = upload.is_some(),
            audio_provided,
            "validating submission"
        );
        let artifact = match upload {
            Some(upload) => Some(upload.into_artifact().await?),
            None => None,
        };
        let input = normalize(artifact, question, audio_provided)?;
        let request = TutorRequest::new(self.persona.clone(), input);

        info!(stage = ?Stage::Reasoning, parts = request.parts.len(), "asking the tutor");
        let started = Instant::now();
        let answer = bounded(
            self.reasoning_timeout,
            self.reasoning.generate(&request, credential),
        )
        .await
        .unwrap_or_else(|limit| Err(ServiceError::Timeout { limit }.into()));
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = answer.is_ok(),
            "reasoning finished"
        );
        answer
    }

    async fn speak(&self, text: &str) -> Result<AudioArtifact, SynthesisError> {
        bounded(self.speech_timeout, self.speech.synthesize(text))
            .await
            .unwrap_or_else(|limit| Err(SynthesisError::Timeout { limit }))
    }
}

/// Runs `fut` under `limit`, yielding the exceeded bound on expiry.
async fn bounded<F: Future>(limit: Duration, fut: F) -> Result<F::Output, Duration> {
    tokio::time::timeout(limit, fut).await.map_err(|_| limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentPart, ImageData};
    use crate::persona::FALLBACK_PROMPT;
    use crate::reasoning::MockReasoningService;
    use crate::speech::MockSpeechService;

    fn credential() -> Option<Credential> {
        Credential::new("test-key")
    }

    fn reasoning_never_called() -> MockReasoningService {
        let mut reasoning = MockReasoningService::new();
        reasoning.expect_generate().times(0);
        reasoning
    }

    fn speech_never_called() -> MockSpeechService {
        let mut speech = MockSpeechService::new();
        speech.expect_synthesize().times(0);
        speech
    }

    fn speech_ok() -> MockSpeechService {
        let mut speech = MockSpeechService::new();
        speech
            .expect_synthesize()
            .times(1)
            .returning(|_| Ok(AudioArtifact::mp3(vec![0xFF, 0xFB])));
        speech
    }

    fn png_upload() -> Upload {
        let mut bytes = std::io::Cursor::new(Vec::new());
        image::RgbImage::new(2, 2)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        Upload::new("image/png", bytes.into_inner())
    }

    #[tokio::test]
    async fn typed_question_is_sent_verbatim_and_spoken() {
        let mut reasoning = MockReasoningService::new();
        reasoning
            .expect_generate()
            .withf(|req, _| req.prompt == "What is photosynthesis?" && req.parts.is_empty())
            .times(1)
            .returning(|_, _| Ok("Plants turn light into sugar.".into()));
        let mut speech = MockSpeechService::new();
        speech
            .expect_synthesize()
            .withf(|text| text == "Plants turn light into sugar.")
            .times(1)
            .returning(|_| Ok(AudioArtifact::mp3(vec![1, 2, 3])));

        let tutor = Tutor::new(reasoning, speech, credential());
        let outcome = tutor
            .submit(Submission::question("What is photosynthesis?"))
            .await;

        assert_eq!(outcome.stage(), Stage::Delivered);
        let Outcome::Delivered(delivery) = outcome else {
            panic!("expected a delivery");
        };
        assert_eq!(delivery.text, "Plants turn light into sugar.");
        assert_eq!(delivery.audio, Some(AudioArtifact::mp3(vec![1, 2, 3])));
        assert!(delivery.warning.is_none());
    }

    #[tokio::test]
    async fn nothing_submitted_is_reported_without_calls() {
        let tutor = Tutor::new(reasoning_never_called(), speech_never_called(), credential());
        let outcome = tutor.submit(Submission::question("")).await;

        assert_eq!(outcome.stage(), Stage::Reported);
        assert!(matches!(outcome.error(), Some(TutorError::EmptyInput)));
    }

    #[tokio::test]
    async fn voice_clip_alone_sends_the_fallback_prompt() {
        let mut reasoning = MockReasoningService::new();
        reasoning
            .expect_generate()
            .withf(|req, _| req.prompt == FALLBACK_PROMPT && req.parts.is_empty())
            .times(1)
            .returning(|_, _| Ok("Sigur, hai să vedem.".into()));

        let clip = AudioClip::wav(vec![b'R', b'I', b'F', b'F']);
        let tutor = Tutor::new(reasoning, speech_ok(), credential());
        let outcome = tutor
            .submit(Submission {
                upload: None,
                question: String::new(),
                voice: Some(clip.clone()),
                trigger: Trigger::AudioCaptured,
            })
            .await;

        let Outcome::Delivered(delivery) = outcome else {
            panic!("expected a delivery");
        };
        assert_eq!(delivery.voice_clip, Some(clip));
    }

    #[tokio::test]
    async fn capture_while_typing_does_not_submit() {
        let tutor = Tutor::new(reasoning_never_called(), speech_never_called(), credential());
        let outcome = tutor
            .submit(Submission {
                upload: None,
                question: "Cât face 7 ori 8?".into(),
                voice: Some(AudioClip::wav(vec![1])),
                trigger: Trigger::AudioCaptured,
            })
            .await;

        assert!(matches!(outcome, Outcome::Ignored));
        assert_eq!(outcome.stage(), Stage::Idle);
    }

    #[tokio::test]
    async fn missing_credential_blocks_before_validation() {
        let tutor = Tutor::new(reasoning_never_called(), speech_never_called(), None);
        // Would be EmptyInput if validation ran first.
        let outcome = tutor.submit(Submission::question("")).await;

        assert!(matches!(outcome.error(), Some(TutorError::Auth { .. })));
        assert!(!tutor.has_credential());
    }

    #[tokio::test]
    async fn image_upload_is_forwarded_unaltered() {
        let upload = png_upload();
        let expected = ImageData {
            mime_type: "image/png".into(),
            bytes: upload.bytes.clone(),
        };

        let mut reasoning = MockReasoningService::new();
        reasoning
            .expect_generate()
            .withf(move |req, _| {
                req.prompt.is_empty() && req.parts == vec![ContentPart::Image(expected.clone())]
            })
            .times(1)
            .returning(|_, _| Ok("Să citim exercițiul împreună.".into()));

        let tutor = Tutor::new(reasoning, speech_ok(), credential());
        let outcome = tutor
            .submit(Submission {
                upload: Some(upload),
                question: String::new(),
                voice: None,
                trigger: Trigger::Submit,
            })
            .await;

        assert_eq!(outcome.stage(), Stage::Delivered);
    }

    #[tokio::test]
    async fn unreadable_document_is_a_user_error() {
        let tutor = Tutor::new(reasoning_never_called(), speech_never_called(), credential());
        let outcome = tutor
            .submit(Submission {
                upload: Some(Upload::new("application/pdf", b"not a pdf".to_vec())),
                question: "ce scrie aici?".into(),
                voice: None,
                trigger: Trigger::Submit,
            })
            .await;

        let error = outcome.error().expect("reported");
        assert!(matches!(error, TutorError::DocumentRead { .. }));
        assert!(error.is_user_error());
    }

    #[tokio::test]
    async fn reasoning_failure_skips_speech() {
        let mut reasoning = MockReasoningService::new();
        reasoning
            .expect_generate()
            .times(1)
            .returning(|_, _| Err(TutorError::EmptyResponse { reason: None }));

        let tutor = Tutor::new(reasoning, speech_never_called(), credential());
        let outcome = tutor.submit(Submission::question("Why?")).await;

        assert!(matches!(
            outcome.error(),
            Some(TutorError::EmptyResponse { .. })
        ));
    }

    #[tokio::test]
    async fn speech_failure_still_delivers_text() {
        let mut reasoning = MockReasoningService::new();
        reasoning
            .expect_generate()
            .times(1)
            .returning(|_, _| Ok("Răspuns.".into()));
        let mut speech = MockSpeechService::new();
        speech
            .expect_synthesize()
            .times(1)
            .returning(|_| Err(SynthesisError::Status { status: 503, chunk: 0 }));

        let tutor = Tutor::new(reasoning, speech, credential());
        let outcome = tutor.submit(Submission::question("Why?")).await;

        let Outcome::Delivered(delivery) = outcome else {
            panic!("expected a delivery");
        };
        assert_eq!(delivery.text, "Răspuns.");
        assert!(delivery.audio.is_none());
        assert!(matches!(
            delivery.warning,
            Some(TutorError::Synthesis(SynthesisError::Status { status: 503, .. }))
        ));
    }

    #[tokio::test]
    async fn configured_persona_leads_every_request() {
        let persona = PersonaDirective::for_language("en");
        let expected = persona.clone();

        let mut reasoning = MockReasoningService::new();
        reasoning
            .expect_generate()
            .withf(move |req, _| req.persona == expected)
            .times(1)
            .returning(|_, _| Ok("ok".into()));

        let tutor = Tutor::new(reasoning, speech_ok(), credential()).with_persona(persona);
        let outcome = tutor.submit(Submission::question("What is 2+2?")).await;

        assert_eq!(outcome.stage(), Stage::Delivered);
    }
}
