//! Gemini API client for the waiter chat.
//!
//! Provides non-streaming access to the `generateContent` endpoint. The full
//! conversation is sent on every call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fusion_core::ConversationMessage;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::config::GeminiConfig;

use super::ChatCompletion;
use super::error::{ApiErrorResponse, GeminiError};
use super::types::{GenerateContentRequest, GenerateContentResponse};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.inner.model)
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(config: &GeminiConfig, timeout: Duration) -> Result<Self, GeminiError> {
        Self::with_base_url(config, timeout, GEMINI_API_BASE)
    }

    /// Create a client against a different API root.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn with_base_url(
        config: &GeminiConfig,
        timeout: Duration,
        base_url: &str,
    ) -> Result<Self, GeminiError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| GeminiError::Unauthorized("API key is not a valid header".to_string()))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-goog-api-key", api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                model: config.model.clone(),
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// The model this client talks to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.inner.base_url,
            self.model()
        )
    }

    /// Send the conversation and get the model's reply text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out, the API returns an
    /// error, or the response has no text.
    #[instrument(skip(self, history), fields(model = %self.model(), turns = history.len()))]
    pub async fn generate(&self, history: &[ConversationMessage]) -> Result<String, GeminiError> {
        let request = GenerateContentRequest::from_history(history);

        let response = self
            .inner
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(GeminiError::from_transport)?;

        let body = self.handle_response(response).await?;

        if let Some(usage) = &body.usage_metadata {
            debug!(
                prompt_tokens = ?usage.prompt_token_count,
                response_tokens = ?usage.candidates_token_count,
                total_tokens = ?usage.total_token_count,
                "Gemini usage"
            );
        }

        body.text().ok_or_else(|| {
            GeminiError::EmptyResponse(body.finish_reason().unwrap_or("unknown").to_string())
        })
    }

    /// Handle a response of any status.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await.map_err(GeminiError::from_transport)?;
            serde_json::from_str(&body)
                .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(self.handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GeminiError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return GeminiError::RateLimited;
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return GeminiError::Unauthorized(format!("Gemini rejected the API key ({status})"));
        }

        match response.text().await {
            Ok(body) => serde_json::from_str::<ApiErrorResponse>(&body).map_or_else(
                |_| GeminiError::Api {
                    status: status.to_string(),
                    message: body,
                },
                |api_error| GeminiError::Api {
                    status: api_error.error.status,
                    message: api_error.error.message,
                },
            ),
            Err(e) => GeminiError::from_transport(e),
        }
    }
}

#[async_trait]
impl ChatCompletion for GeminiClient {
    async fn complete(&self, history: &[ConversationMessage]) -> Result<String, GeminiError> {
        self.generate(history).await
    }
}
