use std::future::Future;
use std::pin::Pin;

use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use crate::error::{GenerationError, MISSING_API_KEY};
use crate::port::{TextGenerator, TextRequest};

use super::models::{
    ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, truncate_error_message,
};

/// Client for the Gemini `generateContent` REST endpoint.
///
/// Each call is a single attempt: no retries and no deadline beyond the
/// transport defaults.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// # Errors
    /// Returns the transport error if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, endpoint, model, api_key))
    }

    #[must_use]
    pub fn with_client(
        client: Client,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    fn generate_url(&self) -> Result<Url, GenerationError> {
        let raw = format!(
            "{}/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );
        Url::parse(&raw).map_err(|e| {
            GenerationError::Configuration(format!("invalid generateContent URL {raw}: {e}"))
        })
    }

    /// Sends `request.prompt` and returns the generated text.
    ///
    /// # Errors
    /// - [`GenerationError::Configuration`] when no API key is configured
    ///   or the endpoint is not a valid URL; nothing is sent in that case.
    /// - [`GenerationError::Network`] when the request cannot be completed.
    /// - [`GenerationError::Upstream`] for non-2xx statuses.
    /// - [`GenerationError::MalformedResponse`] when a 2xx body has no text.
    pub async fn generate_content(&self, request: &TextRequest) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::Configuration(MISSING_API_KEY.to_string()))?;
        let url = self.generate_url()?;

        debug!(
            model = %self.model,
            url = %url,
            prompt_chars = request.prompt.chars().count(),
            temperature = request.temperature,
            max_output_tokens = request.max_output_tokens,
            "sending generateContent request"
        );

        let body = GenerateContentRequest::user_prompt(
            &request.prompt,
            request.temperature,
            request.max_output_tokens,
        );

        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.without_url()))?;

        let status = response.status();
        debug!(model = %self.model, %status, "generateContent response received");

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = upstream_message(&raw)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "unknown error".to_string());
            warn!(model = %self.model, %status, %message, "generateContent returned error status");
            return Err(GenerationError::Upstream {
                status,
                message: truncate_error_message(&message),
            });
        }

        let raw = response
            .text()
            .await
            .map_err(|e| GenerationError::Network(e.without_url()))?;
        if let Some((status, message)) = reported_error(&raw, status) {
            warn!(model = %self.model, %status, %message, "generateContent reported an error");
            return Err(GenerationError::Upstream {
                status,
                message: truncate_error_message(&message),
            });
        }
        let parsed: GenerateContentResponse = serde_json::from_str(&raw).map_err(|e| {
            GenerationError::MalformedResponse(format!("response body is not valid JSON: {e}"))
        })?;

        parsed.extract_text().ok_or_else(|| {
            let reason = parsed.finish_reason().unwrap_or("none");
            GenerationError::MalformedResponse(format!(
                "no text in response (candidates: {}, finish reason: {reason})",
                parsed.candidates.len()
            ))
        })
    }
}

/// `error.message` from an upstream error body, if there is one.
fn upstream_message(raw: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(raw)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty())
}

/// Error envelope carried by a 2xx body. The envelope's own `code` wins
/// over the transport status when it is a valid HTTP status.
fn reported_error(raw: &str, status: StatusCode) -> Option<(StatusCode, String)> {
    let error = serde_json::from_str::<ErrorEnvelope>(raw).ok()?.error;
    let status = error
        .code
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(status);
    let message = error
        .message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| "unknown error".to_string());
    Some((status, message))
}

impl TextGenerator for GeminiClient {
    fn generate<'a>(
        &'a self,
        request: &'a TextRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>> {
        Box::pin(self.generate_content(request))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
