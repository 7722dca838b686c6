//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. `GEMINI_API_KEY` is the only required setting.

use crate::orchestrator::config::{GeminiConfig, OrchestratorConfig};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty
    #[error("{0} not found. Please set it in the environment or a .env file.")]
    Missing(&'static str),

    /// A variable is set but its value is unusable
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// Variable or option name
        key: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini client configuration
    pub gemini: GeminiConfig,
    /// Pipeline configuration
    pub orchestrator: OrchestratorConfig,
}

impl Config {
    /// Load configuration from environment variables with defaults
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        let mut gemini = GeminiConfig::new(api_key);
        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.trim().is_empty()) {
            gemini.model = model;
        }
        if let Some(url) = lookup("GEMINI_API_BASE_URL").filter(|u| !u.trim().is_empty()) {
            gemini.api_base_url = url;
        }
        if let Some(attempts) = parse_var::<u32>(&lookup, "GEMINI_MAX_ATTEMPTS")? {
            if attempts == 0 {
                return Err(ConfigError::Invalid {
                    key: "GEMINI_MAX_ATTEMPTS",
                    reason: "must be > 0".to_string(),
                });
            }
            gemini.retry.max_attempts = attempts;
        }
        if let Some(delay) = parse_var::<u64>(&lookup, "GEMINI_RETRY_DELAY_SECS")? {
            gemini.retry.initial_delay = Duration::from_secs(delay);
        }
        if let Some(timeout) = parse_var::<u64>(&lookup, "GEMINI_TIMEOUT_SECS")? {
            if timeout == 0 {
                return Err(ConfigError::Invalid {
                    key: "GEMINI_TIMEOUT_SECS",
                    reason: "must be > 0".to_string(),
                });
            }
            gemini.timeout = Duration::from_secs(timeout);
        }

        let mut orchestrator = OrchestratorConfig::default();
        if let Some(max_goal) = parse_var::<usize>(&lookup, "MAX_GOAL_LENGTH")? {
            if max_goal == 0 {
                return Err(ConfigError::Invalid {
                    key: "MAX_GOAL_LENGTH",
                    reason: "must be > 0".to_string(),
                });
            }
            orchestrator.max_goal_length = max_goal;
        }

        Ok(Self {
            gemini,
            orchestrator,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: format!("{:?}: {}", raw, e),
            }),
    }
}
