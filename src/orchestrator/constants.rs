//! Orchestrator constants
//!
//! Centralized constants used throughout the orchestrator module.

/// Default Gemini model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini REST API base URL
pub const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default total attempts per call
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry, in seconds
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 5;

/// Default per-request HTTP timeout, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default maximum goal length in characters
pub const DEFAULT_MAX_GOAL_LENGTH: usize = 10_000;

/// Harm categories sent with every request
pub const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Threshold applied to every harm category
pub const SAFETY_THRESHOLD_BLOCK_NONE: &str = "BLOCK_NONE";

/// Finish/block reason reported when the safety filter stopped generation
pub const FINISH_REASON_SAFETY: &str = "SAFETY";

/// Prefix of the in-band marker for safety-blocked responses
pub const BLOCKED_MARKER_PREFIX: &str = "[Response blocked by safety filter";

/// In-band marker for responses without content
pub const EMPTY_CONTENT_MARKER: &str = "[No content returned from API]";

/// Prefix of the in-band marker for degraded call failures
pub const ERROR_MARKER_PREFIX: &str = "[Error: ";

/// Characters of the prompt shown in progress lines
pub const PROMPT_PREVIEW_CHARS: usize = 50;

/// Lead-in of the writer prompt; the serialized notes follow it
pub const WRITER_TASK_PREFIX: &str =
    "Please write a final report based on the following research notes:\n\n";
