//! Debate task: alternating control between a primary agent and its
//! nested opponent

use rostrum_core::{Agent, DebateSide, Speaker};
use rostrum_llm::is_done_signal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::input::{solicit, HumanInput, DEFAULT_INPUT_TIMEOUT};
use crate::task::{TaskConfig, TaskError, TurnTask};

/// Seed of an autonomous debate
pub const AUTONOMOUS_SEED: &str = "get started";

/// Prompt shown to the human in an interactive debate
pub const ARGUMENT_PROMPT: &str = "Your argument (or type 'f' for feedback, 'done' to end):";

/// Configuration for a debate
#[derive(Debug, Clone)]
pub struct DebateConfig {
    /// Cycle budget; `None` runs until a done signal
    pub turns: Option<u32>,
    /// Let the primary agent's model argue instead of asking a human
    pub llm_delegate: bool,
    /// Bound on the human's reply
    pub input_timeout: Duration,
    /// Wall-clock bound on the whole exchange
    pub max_duration: Option<Duration>,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            turns: Some(4),
            llm_delegate: true,
            input_timeout: DEFAULT_INPUT_TIMEOUT,
            max_duration: None,
        }
    }
}

/// Why a debate stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    TurnBudgetExhausted,
    ExplicitDone,
    Timeout,
    NoResponse,
    CollaboratorFault,
}

impl TerminationReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TurnBudgetExhausted => "turn budget exhausted",
            Self::ExplicitDone => "done",
            Self::Timeout => "timed out",
            Self::NoResponse => "no response",
            Self::CollaboratorFault => "collaborator fault",
        }
    }
}

/// Result of a finished debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateOutcome {
    /// Full primary-then-nested cycles
    pub cycles_completed: u32,
    pub termination: TerminationReason,
    /// Side whose history feeds the judge
    pub last_speaker: DebateSide,
    /// The primary signalled done mid-cycle, so the nested side never answered
    pub alternation_interrupted: bool,
    /// Error text when `termination` is `CollaboratorFault`
    pub fault: Option<String>,
}

/// Side that spoke last after `cycles` completed cycles.
///
/// The opposing side on an even count, the primary side on an odd one.
pub fn last_speaker(primary: DebateSide, cycles: u32) -> DebateSide {
    if cycles % 2 == 0 {
        primary.opposite()
    } else {
        primary
    }
}

fn is_exit_reply(reply: &str) -> bool {
    let reply = reply.trim();
    reply.eq_ignore_ascii_case("done") || reply.eq_ignore_ascii_case("f")
}

enum Interrupt {
    Fault(TaskError),
    Deadline,
}

/// Pairs the primary (user-side) agent with the nested opposing task.
///
/// One cycle is a primary step followed by a nested step. The nested reply
/// is handed back into the primary's history, including after the last
/// cycle, so each agent holds a full transcript from its own side.
pub struct DebateTask {
    side: DebateSide,
    primary: TurnTask,
    nested: TurnTask,
    input: Arc<dyn HumanInput>,
    config: DebateConfig,
    outcome: Option<DebateOutcome>,
}

impl DebateTask {
    /// `primary` plays `side`; `nested` must wrap the opposing agent.
    ///
    /// The primary's mode and budget come from `config`: its own task
    /// config only contributes the restart flag.
    pub fn new(
        side: DebateSide,
        mut primary: TurnTask,
        nested: TurnTask,
        input: Arc<dyn HumanInput>,
        config: DebateConfig,
    ) -> Self {
        primary.set_config(TaskConfig {
            restart: primary.config().restart,
            ..Self::primary_config(&config)
        });
        Self {
            side,
            primary,
            nested,
            input,
            config,
            outcome: None,
        }
    }

    fn primary_config(config: &DebateConfig) -> TaskConfig {
        let task = TaskConfig::default().with_turns(config.turns);
        if config.llm_delegate {
            task
        } else {
            task.interactive()
        }
    }

    pub fn side(&self) -> DebateSide {
        self.side
    }

    pub fn outcome(&self) -> Option<&DebateOutcome> {
        self.outcome.as_ref()
    }

    /// Agent playing `side`
    pub fn agent(&self, side: DebateSide) -> &Agent {
        if side == self.side {
            self.primary.agent()
        } else {
            self.nested.agent()
        }
    }

    /// Hand both agents back as (primary, opposing)
    pub fn into_agents(self) -> (Agent, Agent) {
        (self.primary.into_agent(), self.nested.into_agent())
    }

    /// Run the debate to termination.
    ///
    /// A finished debate is terminal: calling `run` again returns the same
    /// outcome without scheduling more turns.
    pub async fn run(&mut self) -> DebateOutcome {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let outcome = self.schedule().await;
        info!(
            side = %self.side,
            cycles = outcome.cycles_completed,
            termination = outcome.termination.label(),
            last_speaker = %outcome.last_speaker,
            "Debate finished"
        );
        self.outcome = Some(outcome.clone());
        outcome
    }

    async fn schedule(&mut self) -> DebateOutcome {
        let (seed, budget) = if !self.config.llm_delegate {
            match solicit(self.input.as_ref(), ARGUMENT_PROMPT, self.config.input_timeout).await {
                Ok(reply) if is_exit_reply(&reply) => {
                    info!("Human ended the debate before the first turn");
                    return self.finish(0, TerminationReason::ExplicitDone, false, None);
                }
                Ok(reply) => {
                    self.primary.agent_mut().bind_human(&reply);
                    (reply, Some(1))
                }
                Err(e) => {
                    warn!(error = %e, "No usable human argument");
                    return self.finish(0, TerminationReason::NoResponse, false, None);
                }
            }
        } else {
            (AUTONOMOUS_SEED.to_string(), self.config.turns)
        };

        let deadline = self.config.max_duration.map(|d| Instant::now() + d);
        let mut cycles = 0u32;
        let mut incoming = (Speaker::Moderator, seed);
        self.primary.begin();

        loop {
            if budget.is_some_and(|b| cycles >= b) {
                self.hand_back(&incoming);
                return self.finish(cycles, TerminationReason::TurnBudgetExhausted, false, None);
            }

            let statement = match Self::bounded(
                deadline,
                self.primary.step(incoming.0.clone(), &incoming.1),
            )
            .await
            {
                Ok(statement) => statement,
                Err(interrupt) => return self.interrupted(cycles, interrupt),
            };

            if is_done_signal(&statement) {
                warn!(
                    cycles,
                    "Primary signalled done mid-cycle; nested side skipped"
                );
                return self.finish(cycles, TerminationReason::ExplicitDone, true, None);
            }

            let from = self.primary.agent().own_speaker();
            self.nested.begin();
            let reply = match Self::bounded(deadline, self.nested.step(from, &statement)).await {
                Ok(reply) => reply,
                Err(interrupt) => return self.interrupted(cycles, interrupt),
            };
            cycles += 1;

            incoming = (self.nested.agent().own_speaker(), reply);
            if is_done_signal(&incoming.1) {
                self.hand_back(&incoming);
                return self.finish(cycles, TerminationReason::ExplicitDone, false, None);
            }
        }
    }

    async fn bounded<F>(deadline: Option<Instant>, step: F) -> Result<String, Interrupt>
    where
        F: std::future::Future<Output = Result<String, TaskError>>,
    {
        let result = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, step)
                .await
                .map_err(|_| Interrupt::Deadline)?,
            None => step.await,
        };
        result.map_err(Interrupt::Fault)
    }

    /// Give the nested side's last reply to the primary
    fn hand_back(&mut self, incoming: &(Speaker, String)) {
        if incoming.0 != Speaker::Moderator {
            self.primary.agent_mut().hear(incoming.0.clone(), &incoming.1);
        }
    }

    fn interrupted(&mut self, cycles: u32, interrupt: Interrupt) -> DebateOutcome {
        match interrupt {
            Interrupt::Deadline => {
                warn!(cycles, "Debate exceeded its time limit");
                self.finish(cycles, TerminationReason::Timeout, false, None)
            }
            Interrupt::Fault(e) => {
                warn!(cycles, error = %e, "Debate step failed");
                self.finish(
                    cycles,
                    TerminationReason::CollaboratorFault,
                    false,
                    Some(e.to_string()),
                )
            }
        }
    }

    fn finish(
        &self,
        cycles: u32,
        termination: TerminationReason,
        alternation_interrupted: bool,
        fault: Option<String>,
    ) -> DebateOutcome {
        DebateOutcome {
            cycles_completed: cycles,
            termination,
            last_speaker: last_speaker(self.side, cycles),
            alternation_interrupted,
            fault,
        }
    }
}

impl std::fmt::Debug for DebateTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebateTask")
            .field("side", &self.side)
            .field("config", &self.config)
            .field("outcome", &self.outcome)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScriptedInput;
    use rostrum_core::{AgentRole, ModelConfig};
    use rostrum_llm::{LlmProvider, MockProvider};

    fn task(role: AgentRole, provider: Arc<dyn LlmProvider>, config: TaskConfig) -> TurnTask {
        let agent = Agent::new(role, "Debate.", ModelConfig::new("mock"));
        TurnTask::new(agent, provider, config)
    }

    fn autonomous(turns: Option<u32>, pro: &[&str], con: &[&str]) -> DebateTask {
        let config = DebateConfig {
            turns,
            ..DebateConfig::default()
        };
        let pro = task(
            AgentRole::Pro,
            Arc::new(MockProvider::scripted(pro).with_latency(0)),
            TaskConfig::default(),
        );
        let con = task(
            AgentRole::Con,
            Arc::new(MockProvider::scripted(con).with_latency(0)),
            TaskConfig::single_round(),
        );
        DebateTask::new(DebateSide::Pro, pro, con, Arc::new(ScriptedInput::new()), config)
    }

    #[test]
    fn test_last_speaker_parity() {
        assert_eq!(last_speaker(DebateSide::Pro, 0), DebateSide::Con);
        assert_eq!(last_speaker(DebateSide::Pro, 3), DebateSide::Pro);
        assert_eq!(last_speaker(DebateSide::Con, 4), DebateSide::Pro);
    }

    #[tokio::test]
    async fn test_runs_exact_cycle_budget() {
        for n in 0..5 {
            let mut debate = autonomous(Some(n), &["pro point"], &["con point"]);
            let outcome = debate.run().await;

            assert_eq!(outcome.cycles_completed, n);
            assert_eq!(outcome.termination, TerminationReason::TurnBudgetExhausted);
            assert_eq!(debate.agent(DebateSide::Con).history().len(), 2 * n as usize);
        }
    }

    #[tokio::test]
    async fn test_nested_done_counts_cycle() {
        let mut debate = autonomous(Some(10), &["point"], &["rebuttal", "DONE"]);
        let outcome = debate.run().await;

        assert_eq!(outcome.cycles_completed, 2);
        assert_eq!(outcome.termination, TerminationReason::ExplicitDone);
        assert!(!outcome.alternation_interrupted);
        assert_eq!(outcome.last_speaker, DebateSide::Con);
    }

    #[tokio::test]
    async fn test_primary_done_interrupts_alternation() {
        let mut debate = autonomous(None, &["point", "done"], &["rebuttal"]);
        let outcome = debate.run().await;

        assert_eq!(outcome.cycles_completed, 1);
        assert!(outcome.alternation_interrupted);
        assert_eq!(outcome.last_speaker, DebateSide::Pro);
        assert_eq!(debate.agent(DebateSide::Con).history().len(), 2);
    }

    #[tokio::test]
    async fn test_fault_terminates() {
        let config = DebateConfig::default();
        let pro = task(
            AgentRole::Pro,
            Arc::new(MockProvider::constant("point").with_latency(0)),
            TaskConfig::default(),
        );
        let con = task(
            AgentRole::Con,
            Arc::new(MockProvider::failing("upstream 500").with_latency(0)),
            TaskConfig::single_round(),
        );
        let mut debate =
            DebateTask::new(DebateSide::Pro, pro, con, Arc::new(ScriptedInput::new()), config);

        let outcome = debate.run().await;
        assert_eq!(outcome.termination, TerminationReason::CollaboratorFault);
        assert!(outcome.fault.unwrap().contains("upstream 500"));
        assert_eq!(outcome.cycles_completed, 0);
    }

    #[tokio::test]
    async fn test_run_is_terminal() {
        let mut debate = autonomous(Some(1), &["a"], &["b"]);
        let first = debate.run().await;
        let second = debate.run().await;

        assert_eq!(first, second);
        assert_eq!(debate.agent(DebateSide::Pro).history().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_duration_times_out() {
        let config = DebateConfig {
            turns: None,
            max_duration: Some(Duration::from_secs(1)),
            ..DebateConfig::default()
        };
        let pro = task(
            AgentRole::Pro,
            Arc::new(MockProvider::constant("point").with_latency(300)),
            TaskConfig::default(),
        );
        let con = task(
            AgentRole::Con,
            Arc::new(MockProvider::constant("rebuttal").with_latency(300)),
            TaskConfig::single_round(),
        );
        let mut debate =
            DebateTask::new(DebateSide::Pro, pro, con, Arc::new(ScriptedInput::new()), config);

        let outcome = debate.run().await;
        assert_eq!(outcome.termination, TerminationReason::Timeout);
        assert_eq!(outcome.cycles_completed, 1);
    }
}
