//! Research task: a tool-using agent that searches the web for sources

use once_cell::sync::Lazy;
use regex::Regex;
use rostrum_core::{Agent, Speaker, TurnRecord};
use rostrum_debate::{TaskConfig, TaskError, TurnTask};
use rostrum_llm::{
    is_done_signal, research_registry, LlmProvider, SearchBackend, ToolCall, ToolExecutor,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const RESEARCH_SEED: &str = "run the search";
pub const DEFAULT_RESEARCH_MAX_STEPS: u32 = 8;

const TOOL_REMINDER: &str = "Reply with a tool call: a JSON object whose \"request\" field \
names the tool to use.";

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s"'<>()\[\]{}]+"#).expect("valid URL pattern"));

/// How a research loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResearchEnd {
    Done,
    StepBudget,
    Fault,
}

/// Sources found by the research agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchReport {
    /// URLs from tool results, in order of first appearance
    pub references: Vec<String>,
    pub steps: u32,
    pub finished_by: ResearchEnd,
    pub fault: Option<String>,
}

/// Collect the distinct URLs found in tool-result records.
///
/// Utterances by agents, humans and the moderator are ignored.
pub fn extract_references(records: &[TurnRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| r.is_tool_result())
        .flat_map(|r| URL_PATTERN.find_iter(&r.content))
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':']).to_string())
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Drives the research agent until it calls done or runs out of steps
pub struct ResearchTask {
    task: TurnTask,
    executor: ToolExecutor,
}

impl ResearchTask {
    /// `agent` should come from [`Agent::research`]; the executor only
    /// honours the capabilities it declares.
    pub fn new(
        agent: Agent,
        provider: Arc<dyn LlmProvider>,
        backend: Arc<dyn SearchBackend>,
        max_steps: u32,
    ) -> Self {
        let executor = ToolExecutor::new(research_registry(backend), agent.capabilities());
        let config = TaskConfig::default().with_turns(Some(max_steps));
        Self {
            task: TurnTask::new(agent, provider, config),
            executor,
        }
    }

    pub fn agent(&self) -> &Agent {
        self.task.agent()
    }

    pub async fn run(&mut self) -> ResearchReport {
        self.task.begin();
        let mut incoming = (Speaker::Moderator, RESEARCH_SEED.to_string());

        let (finished_by, fault) = loop {
            let reply = match self.task.step(incoming.0.clone(), &incoming.1).await {
                Ok(reply) => reply,
                Err(TaskError::BudgetExhausted(budget)) => {
                    info!(budget, "Research step budget exhausted");
                    if matches!(incoming.0, Speaker::Tool(_)) {
                        self.task.agent_mut().hear(incoming.0, &incoming.1);
                    }
                    break (ResearchEnd::StepBudget, None);
                }
                Err(e) => {
                    warn!(error = %e, "Research step failed");
                    break (ResearchEnd::Fault, Some(e.to_string()));
                }
            };

            let Some(call) = ToolCall::parse(&reply) else {
                if is_done_signal(&reply) {
                    break (ResearchEnd::Done, None);
                }
                debug!("Research agent replied without a tool call");
                incoming = (Speaker::Moderator, TOOL_REMINDER.to_string());
                continue;
            };

            let speaker = Speaker::Tool(call.name.clone());
            let done = call.is_done();
            match self.executor.execute(&call.name, call.args).await {
                Ok(_) if done => break (ResearchEnd::Done, None),
                Ok(result) => incoming = (speaker, result.message().to_string()),
                Err(e) if e.is_recoverable_by_agent() => {
                    debug!(error = %e, "Reporting tool error to research agent");
                    incoming = (speaker, serde_json::json!({ "error": e.to_string() }).to_string());
                }
                Err(e) => {
                    warn!(error = %e, "Research tool failed");
                    break (ResearchEnd::Fault, Some(e.to_string()));
                }
            }
        };

        let references = extract_references(self.task.agent().history().records());
        info!(
            steps = self.task.steps(),
            references = references.len(),
            finished_by = ?finished_by,
            "Research finished"
        );

        ResearchReport {
            references,
            steps: self.task.steps(),
            finished_by,
            fault,
        }
    }
}

impl std::fmt::Debug for ResearchTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchTask")
            .field("task", &self.task)
            .field("executor", &self.executor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rostrum_core::{AgentRole, MessageHistory, ModelConfig};
    use rostrum_llm::{MockProvider, SearchHit, ToolError};

    #[derive(Debug)]
    struct FixedBackend;

    #[async_trait]
    impl SearchBackend for FixedBackend {
        async fn search(&self, query: &str, _n: usize) -> Result<Vec<SearchHit>, ToolError> {
            Ok(vec![
                SearchHit {
                    title: query.to_string(),
                    url: "https://example.org/a".to_string(),
                    snippet: String::new(),
                },
                SearchHit {
                    title: query.to_string(),
                    url: "https://example.org/b".to_string(),
                    snippet: "see https://example.org/a.".to_string(),
                },
            ])
        }
    }

    fn research(provider: MockProvider, max_steps: u32) -> ResearchTask {
        let agent = Agent::research("Use metaphor_search.", ModelConfig::new("mock"));
        ResearchTask::new(
            agent,
            Arc::new(provider.with_latency(0)),
            Arc::new(FixedBackend),
            max_steps,
        )
    }

    #[test]
    fn test_extract_references_only_from_tools() {
        let mut history = MessageHistory::new();
        history.push(Speaker::Agent(AgentRole::Pro), "See https://ignored.example/x");
        history.push(
            Speaker::Tool("metaphor_search".to_string()),
            r#"{"search_results":[{"url":"https://a.example/1"},{"url":"http://b.example/2"}]}"#,
        );
        history.push(
            Speaker::Tool("metaphor_search".to_string()),
            "Again: https://a.example/1, and https://c.example/3.",
        );

        assert_eq!(
            extract_references(history.records()),
            vec![
                "https://a.example/1".to_string(),
                "http://b.example/2".to_string(),
                "https://c.example/3".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_search_then_done() {
        let mut task = research(MockProvider::smart(), DEFAULT_RESEARCH_MAX_STEPS);
        let report = task.run().await;

        assert_eq!(report.finished_by, ResearchEnd::Done);
        assert_eq!(report.steps, 2);
        assert_eq!(
            report.references,
            vec!["https://example.org/a".to_string(), "https://example.org/b".to_string()]
        );
    }

    #[tokio::test]
    async fn test_step_budget_keeps_last_results() {
        let provider = MockProvider::constant(
            r#"{"request": "metaphor_search", "query": "remote work", "num_results": 2}"#,
        );
        let mut task = research(provider, 1);
        let report = task.run().await;

        assert_eq!(report.finished_by, ResearchEnd::StepBudget);
        assert_eq!(report.steps, 1);
        assert_eq!(report.references.len(), 2);
    }

    #[tokio::test]
    async fn test_reminder_and_bad_arguments() {
        let provider = MockProvider::scripted(&[
            "I think we should look around.",
            r#"{"request": "metaphor_search", "query": ""}"#,
            r#"{"request": "done_tool"}"#,
        ]);
        let mut task = research(provider, 5);
        let report = task.run().await;

        assert_eq!(report.finished_by, ResearchEnd::Done);
        assert!(report.references.is_empty());

        let records = task.agent().history().records();
        assert_eq!(records[2].content, TOOL_REMINDER);
        assert!(records[4].is_tool_result());
        assert!(records[4].content.contains("error"));
    }

    #[tokio::test]
    async fn test_fault_is_reported() {
        let mut task = research(MockProvider::failing("down"), 3);
        let report = task.run().await;

        assert_eq!(report.finished_by, ResearchEnd::Fault);
        assert!(report.fault.unwrap().contains("down"));
    }
}
