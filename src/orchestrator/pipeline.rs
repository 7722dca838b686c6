//! Research pipeline
//!
//! Drives the fixed three-stage flow: the planner breaks the goal into
//! questions, the researcher answers each one, and the writer turns the
//! notes into a Markdown report. Any error that escapes the client aborts
//! the run and is tagged with the stage it happened in; notes gathered so
//! far are dropped.

use crate::error::{AppError, Stage};
use crate::orchestrator::api_client::{GeminiClient, GenerateContent, HttpTransport};
use crate::orchestrator::config::OrchestratorConfig;
use crate::orchestrator::constants::WRITER_TASK_PREFIX;
use crate::orchestrator::plan_extractor::{extract_plan, Plan, PlanSource};
use crate::orchestrator::roles::Role;
use crate::orchestrator::utils::hash_goal;
use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

/// One answered research question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchNote {
    /// The question from the plan
    pub question: String,
    /// The researcher's answer (may be an in-band marker)
    pub finding: String,
}

/// Output of a completed run
#[derive(Debug, Clone)]
pub struct Report {
    /// Questions that were researched
    pub plan: Plan,
    /// Findings, in plan order
    pub notes: Vec<ResearchNote>,
    /// The writer's raw output
    pub text: String,
}

/// Runs the planner → researcher → writer pipeline
pub struct Orchestrator<T = HttpTransport> {
    client: GeminiClient<T>,
    config: OrchestratorConfig,
}

impl<T: GenerateContent> Orchestrator<T> {
    /// Create an orchestrator around a configured client
    pub fn new(client: GeminiClient<T>, config: OrchestratorConfig) -> Self {
        Self { client, config }
    }

    /// Run the whole pipeline for a goal
    ///
    /// # Errors
    /// * `AppError::InvalidGoal` if the goal is empty or too long.
    /// * `AppError::StageFailed` if a remote call raised during any stage.
    pub async fn run(&self, goal: &str) -> Result<Report, AppError> {
        let goal = validate_goal(goal, self.config.max_goal_length)?;

        let span = tracing::info_span!(
            "run",
            run_id = %Uuid::new_v4(),
            goal_hash = %hash_goal(goal),
        );

        async move {
            tracing::info!(agent = "Planner", "Task: {}", goal);
            let plan = self.plan(goal).await?;
            tracing::info!(
                num_questions = plan.len(),
                parallel = self.config.parallel_research,
                "Planner's plan received. Starting research..."
            );

            let notes = self.research(&plan).await?;
            tracing::info!("All research complete. Tasking writer...");

            let text = self.write(&notes).await?;
            tracing::info!(report_len = text.len(), "Report complete.");

            Ok::<_, AppError>(Report { plan, notes, text })
        }
        .instrument(span)
        .await
    }

    async fn plan(&self, goal: &str) -> Result<Plan, AppError> {
        let plan_text = self
            .client
            .invoke(Role::Planner, goal)
            .await
            .map_err(|e| e.in_stage(Stage::Planning))?;
        tracing::info!(agent = "Planner", "Output (Plan):\n{}", plan_text);

        let (plan, source) = extract_plan(&plan_text, goal);
        match source {
            PlanSource::Json => {}
            PlanSource::Lines => tracing::warn!(
                "Planner did not return valid JSON. Splitting by newline as fallback."
            ),
            PlanSource::Fallback => tracing::warn!(
                "Planner failed to create a plan. Defaulting to single-step research."
            ),
        }
        Ok(plan)
    }

    async fn research(&self, plan: &Plan) -> Result<Vec<ResearchNote>, AppError> {
        let total = plan.len();
        if self.config.parallel_research {
            // try_join_all keeps input order and stops at the first error
            let calls = plan
                .iter()
                .enumerate()
                .map(|(i, question)| self.research_one(question, i + 1, total));
            return try_join_all(calls).await;
        }

        let mut notes = Vec::with_capacity(total);
        for (i, question) in plan.iter().enumerate() {
            notes.push(self.research_one(question, i + 1, total).await?);
        }
        Ok(notes)
    }

    async fn research_one(
        &self,
        question: &str,
        index: usize,
        total: usize,
    ) -> Result<ResearchNote, AppError> {
        tracing::info!(agent = "Researcher", index, total, "Task: {}", question);
        let finding = self
            .client
            .invoke(Role::Researcher, question)
            .await
            .map_err(|e| e.in_stage(Stage::Researching { index, total }))?;
        tracing::info!(agent = "Researcher", index, total, "Output (Findings):\n{}", finding);

        Ok(ResearchNote {
            question: question.to_string(),
            finding,
        })
    }

    async fn write(&self, notes: &[ResearchNote]) -> Result<String, AppError> {
        let task = writer_prompt(notes).map_err(|e| e.in_stage(Stage::Writing))?;
        tracing::info!(
            agent = "Writer",
            "Task: Synthesize all research notes into a final report."
        );
        self.client
            .invoke(Role::Writer, &task)
            .await
            .map_err(|e| e.in_stage(Stage::Writing))
    }
}

/// Build the writer prompt from the collected notes
///
/// The notes are embedded as a pretty-printed JSON array.
///
/// # Arguments
/// * `notes` - Findings in plan order
///
/// # Returns
/// * `Ok(String)` - `WRITER_TASK_PREFIX` followed by the serialized notes
/// * `Err(AppError::Internal)` - If the notes could not be serialized
pub fn writer_prompt(notes: &[ResearchNote]) -> Result<String, AppError> {
    let serialized = serde_json::to_string_pretty(notes)
        .map_err(|e| AppError::Internal(anyhow::Error::from(e)))?;
    Ok(format!("{}{}", WRITER_TASK_PREFIX, serialized))
}

/// Check that the goal has content and is within `max_len` characters
///
/// Surrounding whitespace is ignored for both checks, but the goal is
/// returned unchanged so the planner sees exactly what the user typed.
///
/// # Arguments
/// * `goal` - The research goal from the command line
/// * `max_len` - Maximum length in characters, not counting surrounding whitespace
///
/// # Returns
/// * `Ok(&str)` - The goal as given
/// * `Err(AppError::InvalidGoal)` - If the goal is blank or too long
pub fn validate_goal(goal: &str, max_len: usize) -> Result<&str, AppError> {
    let trimmed = goal.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidGoal("No research goal provided.".to_string()));
    }
    let len = trimmed.chars().count();
    if len > max_len {
        return Err(AppError::InvalidGoal(format!(
            "Goal is {} characters long; the maximum is {}",
            len, max_len
        )));
    }
    Ok(goal)
}
