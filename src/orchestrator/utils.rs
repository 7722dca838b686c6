//! Orchestrator utility functions
//!
//! Small helpers for logging and tracing.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Compute a short hash for a goal string
///
/// Returns an 8-character hexadecimal hash suitable for logging and tracing.
///
/// # Arguments
/// * `goal` - The goal string to hash
///
/// # Returns
/// The first 8 hex digits of the goal's 64-bit hash
pub fn hash_goal(goal: &str) -> String {
    let mut hasher = DefaultHasher::new();
    goal.hash(&mut hasher);
    format!("{:016x}", hasher.finish())[..8].to_string()
}

/// First `max_chars` characters of `text`, for progress lines
///
/// Cuts on a character boundary, never inside a multi-byte sequence.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
