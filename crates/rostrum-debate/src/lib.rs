//! # Rostrum Debate
//!
//! Turn-taking between two debaters, and the judge that follows.
//!
//! ## Key Types
//!
//! - [`TurnTask`] - one agent, one request/response step at a time
//! - [`DebateTask`] - alternates a primary agent with its nested opponent
//! - [`FeedbackTask`] - judges the transcript of whoever spoke last
//! - [`HumanInput`] - where interactive turns come from
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use rostrum_core::{Agent, AgentRole, DebateSide, ModelConfig};
//! use rostrum_debate::{DebateConfig, DebateTask, ScriptedInput, TaskConfig, TurnTask};
//! use rostrum_llm::MockProvider;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let model = ModelConfig::new("mock");
//! let config = DebateConfig { turns: Some(2), ..DebateConfig::default() };
//!
//! let pro = TurnTask::new(
//!     Agent::new(AgentRole::Pro, "Argue in favor.", model.clone()),
//!     Arc::new(MockProvider::smart()),
//!     TaskConfig::default(),
//! );
//! let con = TurnTask::new(
//!     Agent::new(AgentRole::Con, "Argue against.", model),
//!     Arc::new(MockProvider::smart()),
//!     TaskConfig::single_round(),
//! );
//!
//! let mut debate = DebateTask::new(DebateSide::Pro, pro, con, Arc::new(ScriptedInput::new()), config);
//! let outcome = debate.run().await;
//! assert_eq!(outcome.cycles_completed, 2);
//! assert_eq!(outcome.last_speaker, DebateSide::Con);
//! # }
//! ```

pub mod debate;
pub mod feedback;
pub mod input;
pub mod task;

pub use debate::{
    last_speaker, DebateConfig, DebateOutcome, DebateTask, TerminationReason, ARGUMENT_PROMPT,
    AUTONOMOUS_SEED,
};
pub use feedback::{FeedbackReport, FeedbackTask};
pub use input::{solicit, HumanInput, InputError, ScriptedInput, DEFAULT_INPUT_TIMEOUT};
pub use task::{TaskConfig, TaskError, TurnTask};
