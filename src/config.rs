//! Configuration for the tutor.
//!
//! Values are layered with figment: built-in defaults, then an optional JSON
//! file, then `TUTOR_`-prefixed environment variables. The credential is not
//! part of the configuration; see [`crate::credential::Credential`].

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::client::{DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use crate::error::TutorError;
use crate::persona::DEFAULT_LANGUAGE;
use crate::speech::DEFAULT_SPEECH_BASE_URL;

/// Prefix of the environment variables that override configuration values.
pub const ENV_PREFIX: &str = "TUTOR_";

/// Tutor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
#[serde(default)]
pub struct TutorConfig {
    /// Model identifier (e.g., "gemini-1.5-flash")
    #[builder(setter(into), default = String::from("gemini-1.5-flash"))]
    pub model: String,
    /// Base URL of the reasoning service
    #[builder(setter(into), default = DEFAULT_BASE_URL.to_string())]
    pub api_base_url: String,
    /// API version of the reasoning service
    #[builder(setter(into), default = DEFAULT_API_VERSION.to_string())]
    pub api_version: String,
    /// Optional sampling temperature
    #[builder(default, setter(strip_option))]
    pub temperature: Option<f32>,
    /// Optional cap on output tokens
    #[builder(default, setter(strip_option))]
    pub max_output_tokens: Option<u32>,
    /// Base URL of the speech service
    #[builder(setter(into), default = DEFAULT_SPEECH_BASE_URL.to_string())]
    pub speech_base_url: String,
    /// Language code the tutor answers and speaks in
    #[builder(setter(into), default = DEFAULT_LANGUAGE.to_string())]
    pub language: String,
    /// Bound on the reasoning call, in seconds
    #[builder(default = 60)]
    pub reasoning_timeout_secs: u64,
    /// Bound on speech synthesis, in seconds
    #[builder(default = 30)]
    pub speech_timeout_secs: u64,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TutorConfig {
    /// Default location of the configuration file: `~/.gemini-tutor/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".gemini-tutor").join("config.json"))
    }

    /// Loads the configuration from the default file (if it exists) and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`TutorError::Config`] if a layer holds a malformed value.
    pub fn load() -> Result<Self, TutorError> {
        Self::figment(Self::default_path().as_deref()).extract_config()
    }

    /// Loads the configuration from an explicit file and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`TutorError::Config`] if the file does not exist or a layer
    /// holds a malformed value.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, TutorError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TutorError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Self::figment(Some(path)).extract_config()
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Json::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }
}

trait ExtractConfig {
    fn extract_config(self) -> Result<TutorConfig, TutorError>;
}

impl ExtractConfig for Figment {
    fn extract_config(self) -> Result<TutorConfig, TutorError> {
        let config: TutorConfig = self
            .extract()
            .map_err(|e| TutorError::Config(e.to_string()))?;
        if config.reasoning_timeout_secs == 0 || config.speech_timeout_secs == 0 {
            return Err(TutorError::Config("timeouts must be at least 1s".into()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_hosted_services() {
        let c = TutorConfig::default();
        assert_eq!(c.model, "gemini-1.5-flash");
        assert_eq!(c.language, "ro");
        assert_eq!(c.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(c.reasoning_timeout_secs, 60);
        assert_eq!(c.speech_timeout_secs, 30);
        assert!(c.temperature.is_none());
    }

    #[test]
    fn builder_overrides_only_what_is_set() {
        let c = TutorConfig::builder()
            .language("en")
            .temperature(0.2)
            .build();
        assert_eq!(c.language, "en");
        assert_eq!(c.temperature, Some(0.2));
        assert_eq!(c.model, "gemini-1.5-flash");
    }

    #[test]
    fn file_and_env_layers_apply_in_order() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "tutor.json",
                r#"{ "model": "gemini-1.5-pro", "language": "fr", "speech_timeout_secs": 10 }"#,
            )?;
            jail.set_env("TUTOR_LANGUAGE", "de");

            let c = TutorConfig::load_from("tutor.json").expect("config loads");
            assert_eq!(c.model, "gemini-1.5-pro");
            assert_eq!(c.language, "de");
            assert_eq!(c.speech_timeout_secs, 10);
            assert_eq!(c.reasoning_timeout_secs, 60);
            Ok(())
        });
    }

    #[test]
    fn zero_timeout_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("tutor.json", r#"{ "reasoning_timeout_secs": 0 }"#)?;
            let err = TutorConfig::load_from("tutor.json").unwrap_err();
            assert!(matches!(err, TutorError::Config(_)), "got: {err:?}");
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TutorConfig::load_from(dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
