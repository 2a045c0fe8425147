//! Request models for the generateContent call.

use serde::Serialize;

use super::{GenerationConfig, Part};

/// Role of a content turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The learner
    User,
}

/// A content turn made of ordered parts.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    /// Who produced the turn. Omitted for the system instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// The parts that make up the content.
    pub parts: Vec<Part>,
}

/// A request to the generateContent endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// System instruction for the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// The conversation turns. The tutor always sends exactly one.
    pub contents: Vec<Content>,
    /// Sampling parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl Request {
    /// Creates a request with a system instruction and a single user turn.
    ///
    /// # Arguments
    ///
    /// * `system_instruction` - The system instruction for the model
    /// * `parts` - The parts of the user turn, in order
    pub fn with_system_instruction(
        system_instruction: impl Into<String>,
        parts: Vec<Part>,
    ) -> Self {
        Self {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::text(system_instruction)],
            }),
            contents: vec![Content {
                role: Some(Role::User),
                parts,
            }],
            generation_config: None,
        }
    }
}
