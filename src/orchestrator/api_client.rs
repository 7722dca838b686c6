//! Gemini API client
//!
//! `GeminiClient` sends one prompt under one role and returns the model's
//! text. Transient failures (quota, unavailable, internal server error) are
//! retried with exponential backoff and raise `AppError::RetriesExhausted`
//! once the budget is spent. Every other request failure is logged and
//! returned in-band as an `"[Error: ...]"` string so the pipeline keeps going.
//! A response body that cannot be decoded raises
//! `AppError::MalformedResponse`.
//!
//! The HTTP layer sits behind the [`GenerateContent`] trait so the retry
//! logic can be driven by a scripted transport in tests.

use crate::error::{ApiError, AppError};
use crate::orchestrator::config::{GeminiConfig, RetryPolicy};
use crate::orchestrator::constants::{
    BLOCKED_MARKER_PREFIX, EMPTY_CONTENT_MARKER, ERROR_MARKER_PREFIX, FINISH_REASON_SAFETY,
    PROMPT_PREVIEW_CHARS,
};
use crate::orchestrator::gemini_types::{
    GeminiApiRequest, GeminiApiResponse, GoogleSearch, RequestContent, RequestPart,
    SafetyRating, SafetySetting, Tool,
};
use crate::orchestrator::roles::Role;
use crate::orchestrator::utils::preview;
use anyhow::anyhow;
use async_trait::async_trait;
use std::sync::Arc;

/// Something that can execute a `generateContent` request
#[async_trait]
pub trait GenerateContent: Send + Sync {
    /// Send the request and decode the response body
    ///
    /// # Errors
    /// * Transient kinds (`RateLimited`, `Unavailable`, `InternalServer`)
    ///   for HTTP 429, 503 and 500.
    /// * `ApiError::Decode` if a success body does not match the schema.
    /// * Any other `ApiError` for the remaining failures.
    async fn generate_content(
        &self,
        request: &GeminiApiRequest,
    ) -> Result<GeminiApiResponse, ApiError>;
}

#[async_trait]
impl<T: GenerateContent + ?Sized> GenerateContent for Arc<T> {
    async fn generate_content(
        &self,
        request: &GeminiApiRequest,
    ) -> Result<GeminiApiResponse, ApiError> {
        (**self).generate_content(request).await
    }
}

/// reqwest-backed transport for the Gemini REST API
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// Build a transport with its own connection pool and request timeout
    ///
    /// # Errors
    /// Returns `AppError::Internal` if the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, config))
    }

    /// Build a transport on top of a shared client
    pub fn with_client(client: reqwest::Client, config: &GeminiConfig) -> Self {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            config.api_base_url.trim_end_matches('/'),
            config.model,
            config.api_key
        );
        Self { client, url }
    }
}

#[async_trait]
impl GenerateContent for HttpTransport {
    async fn generate_content(
        &self,
        request: &GeminiApiRequest,
    ) -> Result<GeminiApiResponse, ApiError> {
        // without_url() keeps the API key out of error messages
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::debug!(
                status_code = status.as_u16(),
                error_body = %error_body,
                "Gemini API returned error status"
            );

            return Err(ApiError::from_status(status.as_u16(), error_body));
        }

        let response_body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.without_url().to_string()))?;

        serde_json::from_str(&response_body)
            .map_err(|e| ApiError::Decode(format!("{} - Response body: {}", e, response_body)))
    }
}

/// Result of one remote invocation
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    /// Text of the first part of the first candidate
    Text(String),
    /// Generation was stopped by the safety filter
    Blocked {
        /// Safety ratings, rendered for display
        ratings: String,
    },
    /// The call succeeded but returned no content
    Empty,
    /// A non-transient failure, degraded to an in-band value
    Failed(String),
}

impl CallOutcome {
    /// Render the outcome as the text handed to the next stage
    pub fn into_text(self) -> String {
        match self {
            CallOutcome::Text(text) => text,
            CallOutcome::Blocked { ratings } => {
                format!("{}: {}]", BLOCKED_MARKER_PREFIX, ratings)
            }
            CallOutcome::Empty => EMPTY_CONTENT_MARKER.to_string(),
            CallOutcome::Failed(message) => format!("{}{}]", ERROR_MARKER_PREFIX, message),
        }
    }
}

/// Gemini client with retry and response classification
pub struct GeminiClient<T = HttpTransport> {
    transport: T,
    retry: RetryPolicy,
    safety_settings: Vec<SafetySetting>,
}

impl GeminiClient<HttpTransport> {
    /// Create a client that talks to the Gemini REST API
    ///
    /// # Errors
    /// Returns `AppError::Internal` if the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, AppError> {
        Ok(Self::with_transport(HttpTransport::new(config)?, config))
    }
}

impl<T: GenerateContent> GeminiClient<T> {
    /// Create a client over an arbitrary transport
    pub fn with_transport(transport: T, config: &GeminiConfig) -> Self {
        Self {
            transport,
            retry: config.retry,
            safety_settings: config.safety_settings.clone(),
        }
    }

    /// Build the request body for a prompt under a role
    pub fn build_request(&self, role: Role, prompt: &str) -> GeminiApiRequest {
        let directive = role.directive();
        let tools = if directive.allow_search {
            vec![Tool {
                google_search: Some(GoogleSearch {}),
            }]
        } else {
            Vec::new()
        };

        GeminiApiRequest {
            system_instruction: Some(RequestContent {
                role: None,
                parts: vec![RequestPart {
                    text: directive.persona.to_string(),
                }],
            }),
            contents: vec![RequestContent {
                role: Some("user".to_string()),
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            safety_settings: self.safety_settings.clone(),
            tools,
        }
    }

    /// Call the model and return its text
    ///
    /// Blocked, empty and degraded outcomes come back as marker strings.
    ///
    /// # Arguments
    /// * `role` - Selects the persona and whether Google Search is attached
    /// * `prompt` - The task text sent as the single user turn
    ///
    /// # Returns
    /// The first part's text, or one of the `[Response blocked ...]`,
    /// `[No content returned from API]` or `[Error: ...]` markers
    ///
    /// # Errors
    /// * `AppError::RetriesExhausted` if every attempt failed transiently.
    /// * `AppError::MalformedResponse` if the response body could not be decoded.
    pub async fn invoke(&self, role: Role, prompt: &str) -> Result<String, AppError> {
        Ok(self.invoke_outcome(role, prompt).await?.into_text())
    }

    /// Call the model and return the classified outcome
    ///
    /// # Errors
    /// Same as [`GeminiClient::invoke`].
    pub async fn invoke_outcome(&self, role: Role, prompt: &str) -> Result<CallOutcome, AppError> {
        let request = self.build_request(role, prompt);
        let search = role.directive().allow_search;
        let max_attempts = self.retry.max_attempts.max(1);

        let mut attempt = 0;
        loop {
            attempt += 1;
            tracing::info!(
                role = %role,
                attempt,
                max_attempts,
                prompt_len = prompt.len(),
                "Calling Gemini (Search Enabled: {}). Task: {}...",
                search,
                preview(prompt, PROMPT_PREVIEW_CHARS)
            );

            let error = match self.transport.generate_content(&request).await {
                Ok(response) => return Ok(interpret_response(&response)),
                Err(error) => error,
            };

            match error {
                error if error.is_transient() => {
                    if attempt >= max_attempts {
                        tracing::error!(role = %role, attempts = attempt, "All retries failed.");
                        return Err(AppError::RetriesExhausted {
                            attempts: attempt,
                            last_error: error,
                        });
                    }
                    let delay = self.retry.delay_after(attempt);
                    tracing::warn!(
                        role = %role,
                        attempt,
                        max_attempts,
                        delay_secs = delay.as_secs_f64(),
                        "API call failed: {}. Retrying in {:?}...",
                        error,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                ApiError::Decode(message) => {
                    return Err(AppError::MalformedResponse(message));
                }
                error => {
                    tracing::error!(role = %role, error = %error, "An unexpected error occurred");
                    return Ok(CallOutcome::Failed(error.to_string()));
                }
            }
        }
    }
}

/// Classify a decoded response
///
/// A first part without text (function call, inline data) counts as no
/// content, the same as a candidate without parts.
fn interpret_response(response: &GeminiApiResponse) -> CallOutcome {
    let candidate = response.candidates.first();
    let first_text = candidate
        .and_then(|c| c.content.as_ref())
        .and_then(|content| content.parts.first())
        .and_then(|part| part.text.as_ref());

    if let Some(text) = first_text {
        return CallOutcome::Text(text.clone());
    }

    // No candidates, no parts, or no text in the first part
    let (reason, ratings) = match candidate {
        Some(c) => (c.finish_reason.as_deref(), c.safety_ratings.as_slice()),
        None => match &response.prompt_feedback {
            Some(feedback) => (
                feedback.block_reason.as_deref(),
                feedback.safety_ratings.as_slice(),
            ),
            None => (None, &[][..]),
        },
    };

    if reason == Some(FINISH_REASON_SAFETY) {
        let ratings = format_ratings(ratings);
        tracing::warn!(ratings = %ratings, "Response blocked by safety filter");
        return CallOutcome::Blocked { ratings };
    }

    tracing::warn!(
        finish_reason = reason.unwrap_or("none"),
        "API call successful but returned no content parts"
    );
    CallOutcome::Empty
}

fn format_ratings(ratings: &[SafetyRating]) -> String {
    if ratings.is_empty() {
        return "no ratings reported".to_string();
    }
    ratings
        .iter()
        .map(|r| {
            if r.blocked {
                format!("{}={} (blocked)", r.category, r.probability)
            } else {
                format!("{}={}", r.category, r.probability)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
