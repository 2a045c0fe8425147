//! Client implementation for the Gemini generateContent API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::config::TutorConfig;
use crate::credential::Credential;
use crate::error::{ServiceError, TutorError};
use crate::models::{GenerationConfig, ModelParams, Part, Request, RequestType, Response};
use crate::reasoning::{ReasoningService, TutorRequest};

/// Default API endpoint for Google's Generative AI service
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default API version
pub const DEFAULT_API_VERSION: &str = "v1beta";
/// Header carrying the API key, so the key never appears in a URL
const API_KEY_HEADER: &str = "x-goog-api-key";

/// A client for the Gemini generateContent API.
#[derive(Debug, Clone)]
pub struct GenerativeModel {
    params: ModelParams,
    base_url: String,
    api_version: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl GenerativeModel {
    /// Creates a new GenerativeModel with the specified model parameters.
    ///
    /// # Arguments
    ///
    /// * `params` - The model parameters
    /// * `timeout_secs` - Bound on each call, connection included
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(params: impl Into<ModelParams>, timeout_secs: u64) -> Result<Self, TutorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(ServiceError::Request)?;

        Ok(Self {
            params: params.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs,
            client,
        })
    }

    /// Creates a GenerativeModel from the tutor configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &TutorConfig) -> Result<Self, TutorError> {
        let generation_config = GenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
        .non_empty();
        let params = ModelParams {
            model: config.model.clone(),
            generation_config,
        };

        let mut model = Self::new(params, config.reasoning_timeout_secs)?;
        model.base_url = config.api_base_url.trim_end_matches('/').to_string();
        model.api_version = config.api_version.clone();
        Ok(model)
    }

    /// The model identifier requests are sent to.
    pub fn model(&self) -> &str {
        &self.params.model
    }

    fn build_url(&self, request_type: RequestType) -> String {
        format!(
            "{}/{}/models/{}:{}",
            self.base_url, self.api_version, self.params.model, request_type
        )
    }

    /// Maps a tutor request to the wire request.
    ///
    /// The persona becomes the system instruction. The single user turn holds
    /// the prompt followed by the content parts. An empty prompt is left out
    /// because the API rejects empty text parts.
    pub fn build_request(&self, request: &TutorRequest) -> Request {
        let mut parts = Vec::with_capacity(request.parts.len() + 1);
        if !request.prompt.is_empty() {
            parts.push(Part::text(request.prompt.clone()));
        }
        parts.extend(request.parts.iter().map(Part::from));

        let mut wire = Request::with_system_instruction(request.persona.as_str(), parts);
        wire.generation_config = self.params.generation_config.clone();
        wire
    }

    /// Makes a request to the Gemini AI API.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or answers with a failure status.
    async fn make_request(
        &self,
        url: &str,
        request: &Request,
        credential: &Credential,
    ) -> Result<reqwest::Response, TutorError> {
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, credential.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, body));
        }

        Ok(response)
    }

    fn transport_error(&self, e: reqwest::Error) -> TutorError {
        if e.is_timeout() {
            ServiceError::Timeout {
                limit: Duration::from_secs(self.timeout_secs),
            }
            .into()
        } else {
            ServiceError::Request(e).into()
        }
    }

    /// Generates a response using the Gemini AI API.
    ///
    /// # Arguments
    ///
    /// * `request` - The wire request
    /// * `credential` - The API key
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or if the response cannot be parsed.
    pub async fn generate_response(
        &self,
        request: &Request,
        credential: &Credential,
    ) -> Result<Response, TutorError> {
        let url = self.build_url(RequestType::GenerateContent);
        let body = self
            .make_request(&url, request, credential)
            .await?
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(serde_json::from_str(&body).map_err(ServiceError::Decode)?)
    }
}

#[async_trait]
impl ReasoningService for GenerativeModel {
    async fn generate(
        &self,
        request: &TutorRequest,
        credential: &Credential,
    ) -> Result<String, TutorError> {
        let wire = self.build_request(request);
        let parts = wire.contents.iter().map(|c| c.parts.len()).sum::<usize>();
        info!(model = %self.params.model, parts, "calling reasoning service");

        let response = self.generate_response(&wire, credential).await?;
        if let Some(usage) = &response.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                total_tokens = usage.total_token_count,
                "reasoning usage"
            );
        }

        response.text().ok_or_else(|| TutorError::EmptyResponse {
            reason: response.empty_reason(),
        })
    }
}

/// Maps a failure status to the error taxonomy.
///
/// An invalid key comes back as 400 `API_KEY_INVALID`, a missing permission
/// as 401 or 403; all three are credential problems.
fn classify_failure(status: StatusCode, body: String) -> TutorError {
    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || body.contains("API_KEY_INVALID")
    {
        return TutorError::Auth {
            detail: format!("the service refused the API key (status {status})"),
        };
    }
    ServiceError::Status {
        status: status.as_u16(),
        body,
    }
    .into()
}
