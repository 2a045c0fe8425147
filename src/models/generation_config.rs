use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Sampling parameters sent with a request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(doc)]
pub struct GenerationConfig {
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub temperature: Option<f32>,
    /// Maximum number of output tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    /// Returns `None` when no parameter is set, so the field can be omitted.
    pub fn non_empty(self) -> Option<Self> {
        (self != Self::default()).then_some(self)
    }
}
