//! Error types and error handling for the application
//!
//! `AppError` is what escapes a remote call or a pipeline stage.
//! `ApiError` is the tagged failure kind of a single request to the model
//! service; the client dispatches on it to decide between retrying and
//! degrading to an in-band error string.

use std::fmt;
use thiserror::Error;

/// Application-level error types
///
/// Anything that reaches the top of a run is one of these variants.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The research goal was rejected before any remote call
    #[error("Invalid goal: {0}")]
    InvalidGoal(String),

    /// The service answered with a body we could not interpret
    #[error("Invalid response structure from API: {0}")]
    MalformedResponse(String),

    /// Every attempt failed with a transient error
    #[error("API call failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// The error returned by the final attempt
        last_error: ApiError,
    },

    /// A pipeline stage failed; the remaining stages were skipped
    #[error("{stage} stage failed: {source}")]
    StageFailed {
        /// Stage the run was in when it failed
        stage: Stage,
        /// Underlying cause
        #[source]
        source: Box<AppError>,
    },

    /// Internal error (catch-all for unexpected errors)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wrap this error with the stage it occurred in
    pub fn in_stage(self, stage: Stage) -> Self {
        AppError::StageFailed {
            stage,
            source: Box::new(self),
        }
    }
}

/// Failure of one request to the model service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP 429 / RESOURCE_EXHAUSTED
    #[error("rate limit or quota exceeded (HTTP 429): {0}")]
    RateLimited(String),

    /// HTTP 503
    #[error("service unavailable (HTTP 503): {0}")]
    Unavailable(String),

    /// HTTP 500
    #[error("internal server error (HTTP 500): {0}")]
    InternalServer(String),

    /// Any other non-success HTTP status
    #[error("API returned error status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// Request could not be sent or the response could not be read
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body did not match the expected schema
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether this failure is worth retrying
    ///
    /// Only quota exhaustion, unavailability and server errors are retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::RateLimited(_) | ApiError::Unavailable(_) | ApiError::InternalServer(_)
        )
    }

    /// Map a non-success HTTP status and its body to an error kind
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            429 => ApiError::RateLimited(body),
            503 => ApiError::Unavailable(body),
            500 => ApiError::InternalServer(body),
            _ => ApiError::Status { status, body },
        }
    }
}

/// Stage of a pipeline run, used to label failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Planner call and plan extraction
    Planning,
    /// Researcher call for question `index` (1-based) of `total`
    Researching {
        /// 1-based question index
        index: usize,
        /// Number of questions in the plan
        total: usize,
    },
    /// Writer call
    Writing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Planning => write!(f, "planning"),
            Stage::Researching { index, total } => write!(f, "research {}/{}", index, total),
            Stage::Writing => write!(f, "writing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_kinds() {
        assert!(ApiError::RateLimited("quota".into()).is_transient());
        assert!(ApiError::Unavailable("down".into()).is_transient());
        assert!(ApiError::InternalServer("oops".into()).is_transient());

        assert!(!ApiError::Transport("refused".into()).is_transient());
        assert!(!ApiError::Decode("bad".into()).is_transient());
        assert!(!ApiError::Status {
            status: 400,
            body: "bad request".into()
        }
        .is_transient());
    }

    #[test]
    fn test_from_status_mapping() {
        assert_eq!(
            ApiError::from_status(429, "x".into()),
            ApiError::RateLimited("x".into())
        );
        assert_eq!(
            ApiError::from_status(503, "x".into()),
            ApiError::Unavailable("x".into())
        );
        assert_eq!(
            ApiError::from_status(500, "x".into()),
            ApiError::InternalServer("x".into())
        );
        assert_eq!(
            ApiError::from_status(404, "x".into()),
            ApiError::Status {
                status: 404,
                body: "x".into()
            }
        );
        // 502 is not one of the retried kinds
        assert!(!ApiError::from_status(502, "x".into()).is_transient());
    }

    #[test]
    fn test_stage_failed_message() {
        let err = AppError::MalformedResponse("no text".into())
            .in_stage(Stage::Researching { index: 2, total: 3 });
        let msg = err.to_string();
        assert!(msg.starts_with("research 2/3 stage failed"), "got: {}", msg);
        assert!(msg.contains("no text"));
    }
}
