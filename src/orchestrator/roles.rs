//! Agent roles
//!
//! The pipeline has exactly three roles. Each carries a fixed persona that is
//! sent as the system instruction, and a flag saying whether the model may
//! ground its answer with search.

use std::fmt;

const PLANNER_PERSONA: &str = r#"You are a meticulous Project Manager. Your job is to break down a complex research goal into a small list of 3-5 specific, sequential research questions.
You must respond ONLY with a valid JSON array of strings. Do not include any other text, markdown, or explanations.
Example: ["question 1", "question 2", "question 3"]"#;

const RESEARCHER_PERSONA: &str = "You are an expert Research Analyst. Your job is to find the most relevant, up-to-date information for a specific query.
You MUST use your search tool to find this information.
Respond with a concise, factual summary of your findings. Cite sources if possible.";

const WRITER_PERSONA: &str = "You are a professional Report Writer. Your job is to take a collection of research notes (each tied to a specific question) and synthesize them into a single, cohesive, well-structured report.
Do not just list the findings; weave them into a narrative.
Start with an introduction, then present the findings in body paragraphs, and conclude with a summary.
Respond in well-formatted Markdown (use headings, bold text, and lists where appropriate).";

/// One of the three pipeline roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Breaks the goal into research questions
    Planner,
    /// Answers a single question using search
    Researcher,
    /// Synthesizes all findings into the final report
    Writer,
}

/// Persona text and search permission for a role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleDirective {
    /// System instruction sent with every call under this role
    pub persona: &'static str,
    /// Whether the search grounding tool is attached
    pub allow_search: bool,
}

impl Role {
    /// The directive for this role
    pub const fn directive(self) -> RoleDirective {
        match self {
            Role::Planner => RoleDirective {
                persona: PLANNER_PERSONA,
                allow_search: false,
            },
            Role::Researcher => RoleDirective {
                persona: RESEARCHER_PERSONA,
                allow_search: true,
            },
            Role::Writer => RoleDirective {
                persona: WRITER_PERSONA,
                allow_search: false,
            },
        }
    }

    /// Name used in progress output
    pub const fn label(self) -> &'static str {
        match self {
            Role::Planner => "Planner",
            Role::Researcher => "Researcher",
            Role::Writer => "Writer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
