//! The caller-supplied API key.

use secrecy::{ExposeSecret, SecretString};

/// Environment variable read by [`Credential::from_env`].
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// An opaque API key held for the lifetime of one session.
///
/// The key is never persisted and its `Debug` output is redacted, so it can
/// be carried through traced code paths safely.
#[derive(Debug, Clone)]
pub struct Credential(SecretString);

impl Credential {
    /// Wraps a key. Returns `None` when the key is empty or blank, which the
    /// tutor treats the same as no key at all.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return None;
        }
        Some(Self(SecretString::from(key)))
    }

    /// Reads the key from the `GOOGLE_API_KEY` environment variable, loading
    /// a `.env` file first if one is present.
    pub fn from_env() -> Option<Self> {
        dotenv::dotenv().ok();
        std::env::var(API_KEY_ENV).ok().and_then(Self::new)
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}
