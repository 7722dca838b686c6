//! Shared helpers for integration tests
//!
//! `FakeGemini` answers requests from a handler closure, records every call
//! and can delay specific prompts to shuffle completion order.

#![allow(dead_code)]

use async_trait::async_trait;
use research_agents::error::ApiError;
use research_agents::orchestrator::gemini_types::{
    Candidate, Content, GeminiApiRequest, GeminiApiResponse, Part,
};
use research_agents::orchestrator::{
    GeminiClient, GeminiConfig, GenerateContent, Orchestrator, OrchestratorConfig, RetryPolicy,
    Role,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Handler = Box<dyn Fn(Role, &str) -> Result<GeminiApiResponse, ApiError> + Send + Sync>;

/// One recorded call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub role: Role,
    pub prompt: String,
    pub searched: bool,
}

pub struct FakeGemini {
    handler: Handler,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeGemini {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(Role, &str) -> Result<GeminiApiResponse, ApiError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Delay the answer to a specific prompt
    pub fn with_delay(mut self, prompt: &str, delay: Duration) -> Self {
        self.delays.insert(prompt.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

fn role_of(request: &GeminiApiRequest) -> Role {
    let persona = request
        .system_instruction
        .as_ref()
        .and_then(|c| c.parts.first())
        .map(|p| p.text.as_str())
        .unwrap_or_default();
    [Role::Planner, Role::Researcher, Role::Writer]
        .into_iter()
        .find(|role| role.directive().persona == persona)
        .expect("request carries an unknown persona")
}

#[async_trait]
impl GenerateContent for FakeGemini {
    async fn generate_content(
        &self,
        request: &GeminiApiRequest,
    ) -> Result<GeminiApiResponse, ApiError> {
        let role = role_of(request);
        let prompt = request.contents[0].parts[0].text.clone();
        self.calls.lock().unwrap().push(RecordedCall {
            role,
            prompt: prompt.clone(),
            searched: !request.tools.is_empty(),
        });

        if let Some(delay) = self.delays.get(&prompt) {
            tokio::time::sleep(*delay).await;
        }
        (self.handler)(role, &prompt)
    }
}

pub fn text_response(text: &str) -> GeminiApiResponse {
    GeminiApiResponse {
        candidates: vec![Candidate {
            content: Some(Content {
                parts: vec![Part {
                    text: Some(text.to_string()),
                }],
                role: Some("model".to_string()),
            }),
            finish_reason: Some("STOP".to_string()),
            safety_ratings: vec![],
        }],
        prompt_feedback: None,
    }
}

pub fn test_config() -> GeminiConfig {
    let mut config = GeminiConfig::new("test-key");
    config.retry = RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_secs(5),
    };
    config
}

pub fn orchestrator(fake: &Arc<FakeGemini>, parallel: bool) -> Orchestrator<Arc<FakeGemini>> {
    let client = GeminiClient::with_transport(Arc::clone(fake), &test_config());
    Orchestrator::new(
        client,
        OrchestratorConfig {
            parallel_research: parallel,
            ..Default::default()
        },
    )
}
