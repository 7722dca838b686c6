//! Orchestrator configuration
//!
//! Immutable settings handed to the Gemini client and the pipeline at
//! construction time. Nothing here is mutated once a run starts.

use crate::config::ConfigError;
use crate::orchestrator::constants::{
    DEFAULT_GEMINI_API_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_GOAL_LENGTH, DEFAULT_RETRY_DELAY_SECS, DEFAULT_TIMEOUT_SECS, HARM_CATEGORIES,
    SAFETY_THRESHOLD_BLOCK_NONE,
};
use crate::orchestrator::gemini_types::SafetySetting;
use std::fmt;
use std::time::Duration;

/// Exponential backoff policy for transient API failures
///
/// The client sleeps only between attempts, never after the final one. With
/// `max_attempts = 3` and an initial delay `D`, a call that keeps failing
/// waits `D`, then `2D`, then raises `AppError::RetriesExhausted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled after every retry
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the given failed attempt (1-based)
    ///
    /// Attempt 1 waits the initial delay, attempt 2 twice that, and so on.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor)
    }
}

/// Gemini client configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent with every request
    pub api_key: String,
    /// Model name, e.g. "gemini-2.5-flash"
    pub model: String,
    /// API base URL (overridable for tests)
    pub api_base_url: String,
    /// Per-request HTTP timeout
    pub timeout: Duration,
    /// Retry policy for transient failures
    pub retry: RetryPolicy,
    /// Safety thresholds sent with every request
    pub safety_settings: Vec<SafetySetting>,
}

impl GeminiConfig {
    /// Build a config with default settings for the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base_url: DEFAULT_GEMINI_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            safety_settings: default_safety_settings(),
        }
    }
}

// Keep the key out of logs.
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("safety_settings", &self.safety_settings.len())
            .finish()
    }
}

/// Every harm category set to BLOCK_NONE
pub fn default_safety_settings() -> Vec<SafetySetting> {
    HARM_CATEGORIES
        .iter()
        .map(|category| SafetySetting {
            category: (*category).to_string(),
            threshold: SAFETY_THRESHOLD_BLOCK_NONE.to_string(),
        })
        .collect()
}

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum goal length in characters
    pub max_goal_length: usize,
    /// Run research calls concurrently instead of one at a time
    pub parallel_research: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_goal_length: DEFAULT_MAX_GOAL_LENGTH,
            parallel_research: false,
        }
    }
}

/// Optional overrides, typically taken from command-line flags
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Gemini model name
    pub gemini_model: Option<String>,
    /// Total attempts per call
    pub max_attempts: Option<u32>,
    /// Initial backoff delay in seconds
    pub retry_delay_secs: Option<u64>,
    /// Run research calls concurrently
    pub parallel_research: Option<bool>,
}

/// Validate and apply configuration overrides
///
/// Returns an error if any override is invalid; the configs are left
/// untouched in that case because they are taken by value.
pub fn validate_and_apply_overrides(
    mut gemini: GeminiConfig,
    mut orchestrator: OrchestratorConfig,
    overrides: ConfigOverrides,
) -> Result<(GeminiConfig, OrchestratorConfig), ConfigError> {
    if let Some(model) = overrides.gemini_model {
        if model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "model",
                reason: "cannot be empty".to_string(),
            });
        }
        gemini.model = model;
    }

    if let Some(attempts) = overrides.max_attempts {
        if attempts == 0 {
            return Err(ConfigError::Invalid {
                key: "max_attempts",
                reason: "must be > 0".to_string(),
            });
        }
        gemini.retry.max_attempts = attempts;
    }

    if let Some(delay) = overrides.retry_delay_secs {
        gemini.retry.initial_delay = Duration::from_secs(delay);
    }

    if let Some(parallel) = overrides.parallel_research {
        orchestrator.parallel_research = parallel;
    }

    Ok((gemini, orchestrator))
}
