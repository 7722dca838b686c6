//! Gemini API request/response types
//!
//! Structs that mirror the Gemini `generateContent` JSON format.
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Top-level Gemini API response
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GeminiApiResponse {
    /// List of candidate responses from the model
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Optional feedback about the prompt (e.g., if it was blocked)
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// A single candidate response from the model
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The content of this candidate; absent when generation was blocked
    #[serde(default)]
    pub content: Option<Content>,
    /// Why the model stopped generating (if applicable)
    #[serde(default)]
    pub finish_reason: Option<String>,
    /// Per-category safety ratings
    #[serde(default)]
    pub safety_ratings: Vec<SafetyRating>,
}

/// Content structure containing parts of the response
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Content {
    /// List of content parts (typically one text part)
    #[serde(default)]
    pub parts: Vec<Part>,
    /// Role of the content (e.g., "model")
    #[serde(default)]
    pub role: Option<String>,
}

/// A single part of content
///
/// Non-text parts (function calls, inline data) deserialize with `text: None`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Part {
    /// The text content of this part
    #[serde(default)]
    pub text: Option<String>,
}

/// Safety rating for one harm category
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SafetyRating {
    /// Harm category, e.g. "HARM_CATEGORY_HARASSMENT"
    pub category: String,
    /// Probability bucket, e.g. "NEGLIGIBLE"
    pub probability: String,
    /// Whether this category caused the block
    #[serde(default)]
    pub blocked: bool,
}

/// Feedback about the prompt (e.g., if it was blocked)
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked (if applicable)
    #[serde(default)]
    pub block_reason: Option<String>,
    /// Safety ratings for the prompt
    #[serde(default)]
    pub safety_ratings: Vec<SafetyRating>,
}

/// Request structure for Gemini API
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GeminiApiRequest {
    /// Persona text applied to the whole conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<RequestContent>,
    /// List of content items to send
    pub contents: Vec<RequestContent>,
    /// Safety thresholds per harm category
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
    /// Tools available to the model (search grounding)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

/// Content structure for requests
#[derive(Serialize, Debug, Clone)]
pub struct RequestContent {
    /// Author role ("user"); omitted for system instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// List of content parts
    pub parts: Vec<RequestPart>,
}

/// A single part for requests (typically text)
#[derive(Serialize, Debug, Clone)]
pub struct RequestPart {
    /// The text content
    pub text: String,
}

/// Threshold for one harm category
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SafetySetting {
    /// Harm category, e.g. "HARM_CATEGORY_HATE_SPEECH"
    pub category: String,
    /// Block threshold, e.g. "BLOCK_NONE"
    pub threshold: String,
}

/// Tool declaration
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Enables grounding with Google Search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_search: Option<GoogleSearch>,
}

/// Google Search grounding tool (no options)
#[derive(Serialize, Debug, Clone, Default)]
pub struct GoogleSearch {}
