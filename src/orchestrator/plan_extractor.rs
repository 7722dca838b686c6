//! Plan extraction
//!
//! The planner is asked for a JSON array of questions but is free-form text
//! on the wire. Extraction tries the JSON array first, then one question per
//! non-empty line, then falls back to researching the goal itself.

use std::ops::Deref;

/// Ordered, non-empty list of research questions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    questions: Vec<String>,
}

impl Plan {
    /// Build a plan from a list of questions, rejecting an empty list
    pub fn new(questions: Vec<String>) -> Option<Self> {
        if questions.is_empty() {
            None
        } else {
            Some(Self { questions })
        }
    }

    /// The questions, in research order
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Consume the plan
    pub fn into_questions(self) -> Vec<String> {
        self.questions
    }
}

impl Deref for Plan {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.questions
    }
}

/// Which extraction path produced the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSource {
    /// Planner output was a JSON array of strings
    Json,
    /// Planner output was split into lines
    Lines,
    /// Nothing usable; the goal itself is the only question
    Fallback,
}

/// Extract a plan from planner output
///
/// Never fails. The returned plan is never empty.
///
/// # Arguments
/// * `raw_text` - The planner's output text
/// * `fallback_goal` - The single question to use when nothing can be extracted
///
/// # Returns
/// The plan and the extraction path that produced it: a JSON array of
/// strings, else one question per non-blank line, else `[fallback_goal]`
pub fn extract_plan(raw_text: &str, fallback_goal: &str) -> (Plan, PlanSource) {
    let (questions, source) = match serde_json::from_str::<Vec<String>>(raw_text) {
        Ok(questions) => (questions, PlanSource::Json),
        Err(_) => (split_lines(raw_text), PlanSource::Lines),
    };

    match Plan::new(questions) {
        Some(plan) => (plan, source),
        None => (
            Plan {
                questions: vec![fallback_goal.to_string()],
            },
            PlanSource::Fallback,
        ),
    }
}

fn split_lines(raw_text: &str) -> Vec<String> {
    raw_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
