//! Research Agents Library
//!
//! Turns a one-sentence research goal into a Markdown report by running a
//! planner, a researcher and a writer agent against the Gemini API.
//! The command-line binary is in `src/main.rs`.

pub mod config;
pub mod error;
pub mod orchestrator;
