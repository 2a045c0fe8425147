//! Data structures for the generateContent requests and responses.

mod generation_config;
mod model_params;
mod part;
mod request;
mod request_type;
mod response;

pub use generation_config::GenerationConfig;
pub use model_params::ModelParams;
pub use part::{InlineData, Part};
pub use request::{Content, Request, Role};
pub use request_type::RequestType;
pub use response::{Candidate, CandidateContent, PromptFeedback, Response, UsageMetadata};
