//! Turn task: one agent, one request/response step at a time

use rostrum_core::{Agent, InputSource, Speaker};
use rostrum_llm::{LlmError, LlmProvider, LlmRequest};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from a single step
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Model call failed: {0}")]
    Collaborator(#[from] LlmError),
    #[error("Step budget of {0} exhausted")]
    BudgetExhausted(u32),
}

/// How a turn task is driven
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskConfig {
    /// Turn input may come from outside the system
    pub interactive: bool,
    /// Stop after one exchange per invocation
    pub single_round: bool,
    /// Clear the agent's history at the start of every invocation
    pub restart: bool,
    /// Step budget per invocation; `None` is unbounded
    pub turns: Option<u32>,
}

impl TaskConfig {
    /// One step per invocation, history kept
    pub fn single_round() -> Self {
        Self {
            single_round: true,
            ..Self::default()
        }
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    pub fn with_turns(mut self, turns: Option<u32>) -> Self {
        self.turns = turns;
        self
    }

    /// Effective step budget per invocation
    pub fn budget(&self) -> Option<u32> {
        if self.single_round {
            Some(1)
        } else {
            self.turns
        }
    }
}

/// Wraps one agent and runs its steps.
///
/// A model step records the incoming message under its sender, asks the
/// model, and records the reply under the agent. A human step records only
/// the bound human utterance.
#[derive(Debug)]
pub struct TurnTask {
    agent: Agent,
    provider: Arc<dyn LlmProvider>,
    config: TaskConfig,
    steps: u32,
    debug: bool,
}

impl TurnTask {
    pub fn new(agent: Agent, provider: Arc<dyn LlmProvider>, config: TaskConfig) -> Self {
        Self {
            agent,
            provider,
            config,
            steps: 0,
            debug: false,
        }
    }

    /// Log every utterance at info level
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut Agent {
        &mut self.agent
    }

    pub fn into_agent(self) -> Agent {
        self.agent
    }

    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    pub(crate) fn set_config(&mut self, config: TaskConfig) {
        self.config = config;
    }

    /// Steps taken in the current invocation
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Start a new invocation: reset the step count, and the history if
    /// the task restarts
    pub fn begin(&mut self) {
        if self.config.restart {
            self.agent.restart();
        }
        self.steps = 0;
    }

    /// Run one step answering `message` from `from`
    pub async fn step(&mut self, from: Speaker, message: &str) -> Result<String, TaskError> {
        if let Some(budget) = self.config.budget() {
            if self.steps >= budget {
                return Err(TaskError::BudgetExhausted(budget));
            }
        }
        self.steps += 1;

        let reply = match self.agent.source() {
            InputSource::Human(value) => {
                let value = value.clone();
                self.agent.say(&value);
                value
            }
            InputSource::Model(model) => {
                let request = LlmRequest::for_agent(&self.agent, model, message);
                self.agent.hear(from, message);

                let response = self.provider.complete(request).await?;
                debug!(
                    role = self.agent.role.label(),
                    model = %response.model,
                    latency_ms = response.latency_ms,
                    tokens = ?response.tokens_used,
                    "Step completed"
                );
                self.agent.say(&response.content);
                response.content
            }
        };

        if self.debug {
            info!(speaker = %self.agent.own_speaker(), content = %reply, "Utterance");
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rostrum_core::{AgentRole, ModelConfig};
    use rostrum_llm::MockProvider;

    fn con_task(provider: Arc<MockProvider>, config: TaskConfig) -> TurnTask {
        let agent = Agent::new(AgentRole::Con, "Argue against.", ModelConfig::new("mock"));
        TurnTask::new(agent, provider, config)
    }

    #[tokio::test]
    async fn test_model_step_records_both_sides() {
        let provider = Arc::new(MockProvider::constant("Offices build trust.").with_latency(0));
        let mut task = con_task(provider.clone(), TaskConfig::default());

        let reply = task
            .step(Speaker::Agent(AgentRole::Pro), "Remote work saves time.")
            .await
            .unwrap();

        assert_eq!(reply, "Offices build trust.");
        let records = task.agent().history().records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].speaker, Speaker::Agent(AgentRole::Pro));
        assert_eq!(records[1].speaker, Speaker::Agent(AgentRole::Con));
        assert_eq!(provider.requests()[0].prompt, "Remote work saves time.");
    }

    #[tokio::test]
    async fn test_human_step_records_only_utterance() {
        let provider = Arc::new(MockProvider::smart().with_latency(0));
        let mut task = con_task(provider.clone(), TaskConfig::default());
        task.agent_mut().bind_human("Mentorship needs offices.");

        let reply = task.step(Speaker::Moderator, "get started").await.unwrap();

        assert_eq!(reply, "Mentorship needs offices.");
        assert_eq!(task.agent().history().len(), 1);
        assert_eq!(
            task.agent().history().records()[0].speaker,
            Speaker::Human(AgentRole::Con)
        );
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_single_round_budget_and_restart() {
        let provider = Arc::new(MockProvider::constant("ok").with_latency(0));
        let config = TaskConfig {
            restart: true,
            ..TaskConfig::single_round()
        };
        let mut task = con_task(provider, config);

        task.begin();
        task.step(Speaker::Moderator, "one").await.unwrap();
        assert!(matches!(
            task.step(Speaker::Moderator, "two").await,
            Err(TaskError::BudgetExhausted(1))
        ));

        task.begin();
        assert!(task.agent().history().is_empty());
        task.step(Speaker::Moderator, "three").await.unwrap();
        assert_eq!(task.agent().history().len(), 2);
    }

    #[tokio::test]
    async fn test_fault_keeps_incoming() {
        let provider = Arc::new(MockProvider::failing("503").with_latency(0));
        let mut task = con_task(provider, TaskConfig::default());

        let result = task.step(Speaker::Agent(AgentRole::Pro), "hello").await;

        assert!(matches!(result, Err(TaskError::Collaborator(_))));
        assert_eq!(task.agent().history().len(), 1);
    }
}
