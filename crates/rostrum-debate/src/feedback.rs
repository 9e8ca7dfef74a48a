//! Feedback task: the judge's single step after a debate

use rostrum_core::{format_transcript, Agent, Speaker, TurnRecord};
use rostrum_llm::LlmProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::task::{TaskConfig, TaskError, TurnTask};

/// The judge's verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub judgment: String,
    /// Judged an empty transcript
    pub degraded: bool,
    pub records_considered: usize,
}

/// Runs the feedback agent once over a formatted transcript
#[derive(Debug)]
pub struct FeedbackTask {
    task: TurnTask,
}

impl FeedbackTask {
    pub fn new(agent: Agent, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            task: TurnTask::new(agent, provider, TaskConfig::single_round()),
        }
    }

    pub fn agent(&self) -> &Agent {
        self.task.agent()
    }

    /// Judge the given history. An empty history still gets judged but the
    /// report is marked degraded.
    pub async fn run(&mut self, records: &[TurnRecord]) -> Result<FeedbackReport, TaskError> {
        let degraded = records.is_empty();
        if degraded {
            warn!("Terminal speaker has no history; feedback runs on an empty transcript");
        }

        let transcript = format_transcript(records);
        self.task.begin();
        let judgment = self.task.step(Speaker::Moderator, &transcript).await?;

        info!(records = records.len(), degraded, "Feedback complete");
        Ok(FeedbackReport {
            judgment,
            degraded,
            records_considered: records.len(),
        })
    }
}
