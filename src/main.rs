//! Research Agents
//!
//! Command-line entry point: takes a research goal, runs the planner,
//! researcher and writer agents, and prints the final Markdown report.

use clap::{CommandFactory, Parser};
use research_agents::config::Config;
use research_agents::error::AppError;
use research_agents::orchestrator::config::{validate_and_apply_overrides, ConfigOverrides};
use research_agents::orchestrator::{GeminiClient, Orchestrator};
use std::future::Future;
use std::process::ExitCode;
use tracing::{error, info};

const RULE_WIDTH: usize = 54;

/// Run a multi-agent research system.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// The research goal you want the agents to achieve.
    goal: String,

    /// Gemini model to use (overrides GEMINI_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Research all questions concurrently instead of one at a time
    #[arg(long)]
    parallel_research: bool,

    /// Total attempts per API call (overrides GEMINI_MAX_ATTEMPTS)
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Initial retry delay in seconds (overrides GEMINI_RETRY_DELAY_SECS)
    #[arg(long)]
    retry_delay_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if cli.goal.trim().is_empty() {
        eprintln!("Error: No research goal provided.\n");
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    }

    let orchestrator = match build_orchestrator(&cli) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("{}", "=".repeat(50));
    println!("Starting Multi-Agent System for: {}", cli.goal.trim());
    println!("{}", "=".repeat(50));

    tokio::select! {
        result = orchestrator.run(&cli.goal) => match result {
            Ok(report) => {
                println!("\n{}\n", banner("FINAL REPORT"));
                println!("{}", report.text);
                println!("\n{}\n", "=".repeat(RULE_WIDTH));
                ExitCode::SUCCESS
            }
            Err(e) => {
                print_system_error(&e);
                ExitCode::FAILURE
            }
        },
        _ = wait_for_interrupt(tokio::signal::ctrl_c()) => {
            info!("Process interrupted by user. Exiting.");
            ExitCode::SUCCESS
        }
    }
}

/// Resolve once the user interrupts the process
///
/// If the Ctrl+C handler cannot be installed the error is reported and the
/// future never resolves, so the run carries on without interrupt support.
async fn wait_for_interrupt<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {}
        Err(e) => {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}

fn build_orchestrator(cli: &Cli) -> Result<Orchestrator, AppError> {
    let config = Config::from_env()?;
    let overrides = ConfigOverrides {
        gemini_model: cli.model.clone(),
        max_attempts: cli.max_attempts,
        retry_delay_secs: cli.retry_delay_secs,
        parallel_research: cli.parallel_research.then_some(true),
    };
    let (gemini, orchestrator) =
        validate_and_apply_overrides(config.gemini, config.orchestrator, overrides)?;
    info!(gemini = ?gemini, orchestrator = ?orchestrator, "Configuration loaded");

    let client = GeminiClient::new(&gemini)?;
    Ok(Orchestrator::new(client, orchestrator))
}

fn banner(title: &str) -> String {
    format!("{} {} {}", "=".repeat(20), title, "=".repeat(20))
}

fn print_system_error(error: &AppError) {
    println!("\n{}\n", banner("SYSTEM ERROR"));
    println!("An error occurred in the agent system: {}", error);
    println!("{}\n", "=".repeat(RULE_WIDTH));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_goal_and_flags() {
        let cli = Cli::try_parse_from([
            "research-agents",
            "Summarize recent advances in solid-state batteries.",
            "--parallel-research",
            "--max-attempts",
            "5",
        ])
        .unwrap();
        assert_eq!(
            cli.goal,
            "Summarize recent advances in solid-state batteries."
        );
        assert!(cli.parallel_research);
        assert_eq!(cli.max_attempts, Some(5));
        assert_eq!(cli.model, None);
    }

    #[test]
    fn test_cli_requires_goal() {
        let err = Cli::try_parse_from(["research-agents"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_banner_width() {
        assert_eq!(banner("FINAL REPORT").len(), RULE_WIDTH);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_resolves_on_signal() {
        let waited = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            wait_for_interrupt(async { Ok(()) }),
        )
        .await;
        assert!(waited.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_handler_failure_is_not_an_interrupt() {
        let waited = tokio::time::timeout(
            std::time::Duration::from_secs(60),
            wait_for_interrupt(async {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "no signal driver"))
            }),
        )
        .await;
        assert!(waited.is_err(), "a failed handler install must not end the run");
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
