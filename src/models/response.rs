//! Response models for the generateContent call.

use serde::Deserialize;

use super::Part;

/// A response from the generateContent endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// The generated candidates from the model.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback on the prompt, present when it was blocked.
    pub prompt_feedback: Option<PromptFeedback>,
    /// Metadata about token usage.
    pub usage_metadata: Option<UsageMetadata>,
    /// The version of the model used.
    pub model_version: Option<String>,
}

impl Response {
    /// Concatenates the text parts of the first candidate.
    ///
    /// Returns `None` if there is no candidate or it carries no non-blank text.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(Part::as_text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }

    /// The reason an empty response came back, if the service gave one.
    pub fn empty_reason(&self) -> Option<String> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Some(reason);
        }
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.clone())
    }
}

/// A candidate response from the model.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The content of the candidate response. Absent when it was filtered.
    pub content: Option<CandidateContent>,
    /// The reason why the generation finished, e.g. `STOP` or `SAFETY`.
    pub finish_reason: Option<String>,
}

/// Content of a candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    /// The parts of the answer.
    #[serde(default)]
    pub parts: Vec<Part>,
    /// Role of the producer, normally `model`.
    pub role: Option<String>,
}

/// Feedback about the prompt.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Why the prompt was blocked.
    pub block_reason: Option<String>,
}

/// Metadata about token usage in the request and response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Number of tokens in the prompt.
    #[serde(default)]
    pub prompt_token_count: i32,
    /// Number of tokens in the generated candidates.
    pub candidates_token_count: Option<i32>,
    /// Total number of tokens used.
    #[serde(default)]
    pub total_token_count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Step 1. "}, {"text": "Step 2."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 4, "totalTokenCount": 14},
            "modelVersion": "gemini-1.5-flash"
        }"#;
        let response: Response = serde_json::from_str(body).unwrap();
        assert_eq!(response.text().as_deref(), Some("Step 1. Step 2."));
        assert_eq!(response.usage_metadata.unwrap().total_token_count, 14);
    }

    #[test]
    fn blocked_prompt_has_no_text_and_a_reason() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: Response = serde_json::from_str(body).unwrap();
        assert_eq!(response.text(), None);
        assert_eq!(response.empty_reason().as_deref(), Some("SAFETY"));
    }

    #[test]
    fn filtered_candidate_without_content() {
        let body = r#"{"candidates": [{"finishReason": "RECITATION"}]}"#;
        let response: Response = serde_json::from_str(body).unwrap();
        assert_eq!(response.text(), None);
        assert_eq!(response.empty_reason().as_deref(), Some("RECITATION"));
    }

    #[test]
    fn unknown_part_kinds_are_skipped() {
        let body = r#"{"candidates": [{"content": {"parts": [
            {"executableCode": {"language": "PYTHON", "code": "print(4)"}},
            {"text": "4"}
        ]}}]}"#;
        let response: Response = serde_json::from_str(body).unwrap();
        assert_eq!(response.text().as_deref(), Some("4"));
    }
}
