//! Orchestrator module
//!
//! The Gemini client with its retry policy, the plan extractor, and the
//! three-role research pipeline built on top of them.

pub mod api_client;
pub mod config;
pub mod constants;
pub mod gemini_types;
pub mod pipeline;
pub mod plan_extractor;
pub mod roles;
pub mod utils;

pub use api_client::{CallOutcome, GeminiClient, GenerateContent, HttpTransport};
pub use config::{GeminiConfig, OrchestratorConfig, RetryPolicy};
pub use pipeline::{Orchestrator, Report, ResearchNote};
pub use plan_extractor::{extract_plan, Plan, PlanSource};
pub use roles::{Role, RoleDirective};
