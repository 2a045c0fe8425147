//! Speech through the Google Translate text-to-speech endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use super::text_prep::{clean_for_speech, split_chunks, MAX_CHUNK_CHARS};
use super::{AudioArtifact, SpeechService};
use crate::config::TutorConfig;
use crate::error::SynthesisError;

/// Default base URL of the speech service
pub const DEFAULT_SPEECH_BASE_URL: &str = "https://translate.google.com";
const TTS_PATH: &str = "/translate_tts";
const TTS_CLIENT: &str = "tw-ob";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) gemini-tutor";

/// Speaks text in one fixed language, producing MP3.
#[derive(Debug, Clone)]
pub struct GoogleTranslateSpeech {
    client: reqwest::Client,
    base_url: String,
    language: String,
    timeout_secs: u64,
}

impl GoogleTranslateSpeech {
    /// Creates a synthesizer for the given language code.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(language: impl Into<String>, timeout_secs: u64) -> Result<Self, SynthesisError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_SPEECH_BASE_URL.to_string(),
            language: language.into(),
            timeout_secs,
        })
    }

    /// Creates a synthesizer from the tutor configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &TutorConfig) -> Result<Self, SynthesisError> {
        let mut speech = Self::new(config.language.clone(), config.speech_timeout_secs)?;
        speech.base_url = config.speech_base_url.trim_end_matches('/').to_string();
        Ok(speech)
    }

    /// The language code spoken.
    pub fn language(&self) -> &str {
        &self.language
    }

    fn query(&self, chunk: &str, index: usize, total: usize) -> [(&'static str, String); 6] {
        [
            ("ie", "UTF-8".to_string()),
            ("q", chunk.to_string()),
            ("tl", self.language.clone()),
            ("total", total.to_string()),
            ("idx", index.to_string()),
            ("client", TTS_CLIENT.to_string()),
        ]
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        index: usize,
        total: usize,
    ) -> Result<Vec<u8>, SynthesisError> {
        let url = format!("{}{}", self.base_url, TTS_PATH);
        let response = self
            .client
            .get(&url)
            .query(&self.query(chunk, index, total))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynthesisError::Status {
                status: status.as_u16(),
                chunk: index,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        debug!(chunk = index, bytes = bytes.len(), "speech chunk fetched");
        Ok(bytes.to_vec())
    }

    fn transport_error(&self, e: reqwest::Error) -> SynthesisError {
        if e.is_timeout() {
            SynthesisError::Timeout {
                limit: Duration::from_secs(self.timeout_secs),
            }
        } else {
            SynthesisError::Request(e)
        }
    }
}

#[async_trait]
impl SpeechService for GoogleTranslateSpeech {
    async fn synthesize(&self, text: &str) -> Result<AudioArtifact, SynthesisError> {
        let chunks = split_chunks(&clean_for_speech(text), MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        info!(language = %self.language, chunks = chunks.len(), "synthesizing speech");
        let mut audio = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            // MP3 frames are self-delimiting, so chunk streams concatenate cleanly.
            audio.extend(self.fetch_chunk(chunk, index, chunks.len()).await?);
        }

        Ok(AudioArtifact::mp3(audio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_text_fails_without_a_request() {
        let speech = GoogleTranslateSpeech::new("ro", 5).unwrap();
        let err = speech.synthesize("  **  ** ").await.unwrap_err();
        assert!(matches!(err, SynthesisError::EmptyText), "got: {err:?}");
    }

    #[test]
    fn query_names_language_and_chunk_position() {
        let speech = GoogleTranslateSpeech::new("ro", 5).unwrap();
        let query = speech.query("Bună ziua", 1, 3);
        assert!(query.contains(&("q", "Bună ziua".to_string())));
        assert!(query.contains(&("tl", "ro".to_string())));
        assert!(query.contains(&("idx", "1".to_string())));
        assert!(query.contains(&("total", "3".to_string())));
    }

    #[test]
    fn config_sets_language_and_endpoint() {
        let config = TutorConfig::builder()
            .language("en")
            .speech_base_url("http://localhost:9000/")
            .build();
        let speech = GoogleTranslateSpeech::from_config(&config).unwrap();
        assert_eq!(speech.language(), "en");
        assert_eq!(speech.base_url, "http://localhost:9000");
    }
}
