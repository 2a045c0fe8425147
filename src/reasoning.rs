//! The contract between the orchestrator and the reasoning service.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::content::{ContentPart, ImageData, NormalizedInput};
use crate::credential::Credential;
use crate::error::TutorError;
use crate::persona::PersonaDirective;

/// One request to the reasoning service, built fresh per submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorRequest {
    /// The persona, always sent first
    pub persona: PersonaDirective,
    /// The prompt text, always sent second. May be empty.
    pub prompt: String,
    /// The normalized content parts, in order
    pub parts: Vec<ContentPart>,
}

impl TutorRequest {
    /// Builds a request from a persona and a normalized input.
    pub fn new(persona: PersonaDirective, input: NormalizedInput) -> Self {
        Self {
            persona,
            prompt: input.prompt,
            parts: input.parts,
        }
    }

    /// The ordered items as the service receives them:
    /// `[persona, prompt, *parts]`.
    pub fn items(&self) -> Vec<RequestItem<'_>> {
        let mut items = Vec::with_capacity(self.parts.len() + 2);
        items.push(RequestItem::System(self.persona.as_str()));
        items.push(RequestItem::Text(&self.prompt));
        items.extend(self.parts.iter().map(|part| match part {
            ContentPart::Text(text) => RequestItem::Text(text),
            ContentPart::Image(image) => RequestItem::Image(image),
        }));
        items
    }
}

/// A borrowed view of one item of a [`TutorRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestItem<'a> {
    /// System text
    System(&'a str),
    /// Plain text
    Text(&'a str),
    /// An image
    Image(&'a ImageData),
}

/// A multimodal text-generation backend.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReasoningService: Send + Sync {
    /// Sends the request and returns the generated text.
    ///
    /// # Errors
    ///
    /// * [`TutorError::Auth`] if the credential was refused
    /// * [`TutorError::Service`] for any downstream failure
    /// * [`TutorError::EmptyResponse`] if no text came back
    async fn generate(
        &self,
        request: &TutorRequest,
        credential: &Credential,
    ) -> Result<String, TutorError>;
}
