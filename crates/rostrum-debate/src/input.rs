//! Human input channel
//!
//! The debate and Doc-QA tasks ask a person for input through [`HumanInput`].
//! Every wait is bounded by the caller with [`solicit`]; an expired wait, an
//! empty reply or a closed channel all count as no response.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Default bound on a human reply
pub const DEFAULT_INPUT_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input channel closed")]
    Closed,
    #[error("No reply within {0:?}")]
    TimedOut(Duration),
    #[error("Empty reply")]
    Empty,
    #[error("Malformed reply: {0}")]
    Malformed(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A source of human replies
#[async_trait]
pub trait HumanInput: Send + Sync {
    /// Show `prompt` and wait for one reply
    async fn ask(&self, prompt: &str) -> Result<String, InputError>;
}

/// Ask once, waiting at most `wait`. Returns the trimmed reply.
pub async fn solicit(
    input: &dyn HumanInput,
    prompt: &str,
    wait: Duration,
) -> Result<String, InputError> {
    let reply = match tokio::time::timeout(wait, input.ask(prompt)).await {
        Ok(reply) => reply?,
        Err(_) => {
            warn!(timeout_secs = wait.as_secs(), "No human reply before timeout");
            return Err(InputError::TimedOut(wait));
        }
    };

    let reply = reply.trim();
    if reply.is_empty() {
        debug!("Ignoring empty human reply");
        return Err(InputError::Empty);
    }
    Ok(reply.to_string())
}

#[derive(Debug)]
enum ScriptedReply {
    Text { delay: Duration, text: String },
    Silence,
}

/// Replays a fixed script of replies, for tests and demos.
///
/// Once the script runs out every further question fails with
/// [`InputError::Closed`].
#[derive(Debug, Default)]
pub struct ScriptedInput {
    script: Mutex<VecDeque<ScriptedReply>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply immediately
    pub fn reply(self, text: &str) -> Self {
        self.reply_after(Duration::ZERO, text)
    }

    /// Reply after a delay (honours a paused tokio clock)
    pub fn reply_after(mut self, delay: Duration, text: &str) -> Self {
        self.script.get_mut().push_back(ScriptedReply::Text {
            delay,
            text: text.to_string(),
        });
        self
    }

    /// Never reply to the next question
    pub fn silence(mut self) -> Self {
        self.script.get_mut().push_back(ScriptedReply::Silence);
        self
    }

    /// Every prompt shown so far
    pub async fn prompts(&self) -> Vec<String> {
        self.asked.lock().await.clone()
    }
}

#[async_trait]
impl HumanInput for ScriptedInput {
    async fn ask(&self, prompt: &str) -> Result<String, InputError> {
        self.asked.lock().await.push(prompt.to_string());
        let next = self.script.lock().await.pop_front();

        match next {
            Some(ScriptedReply::Text { delay, text }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(text)
            }
            Some(ScriptedReply::Silence) => std::future::pending().await,
            None => Err(InputError::Closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_solicit_returns_trimmed_reply() {
        let input = ScriptedInput::new().reply_after(Duration::from_secs(5), "  Commutes waste time. \n");
        let reply = solicit(&input, "Your argument:", DEFAULT_INPUT_TIMEOUT).await.unwrap();

        assert_eq!(reply, "Commutes waste time.");
        assert_eq!(input.prompts().await, vec!["Your argument:".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_solicit_times_out() {
        let input = ScriptedInput::new().silence();
        let result = solicit(&input, "Your argument:", Duration::from_secs(600)).await;

        assert!(matches!(result, Err(InputError::TimedOut(_))));
    }

    #[tokio::test]
    async fn test_empty_and_closed() {
        let input = ScriptedInput::new().reply("   ");
        assert!(matches!(
            solicit(&input, "?", DEFAULT_INPUT_TIMEOUT).await,
            Err(InputError::Empty)
        ));
        assert!(matches!(
            solicit(&input, "?", DEFAULT_INPUT_TIMEOUT).await,
            Err(InputError::Closed)
        ));
    }
}
