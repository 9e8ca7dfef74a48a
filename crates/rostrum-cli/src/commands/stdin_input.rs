//! Terminal human-input channel

use async_trait::async_trait;
use colored::Colorize;
use rostrum_debate::{HumanInput, InputError};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Reads one line from stdin per question
pub struct StdinInput {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl StdinInput {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

#[async_trait]
impl HumanInput for StdinInput {
    async fn ask(&self, prompt: &str) -> Result<String, InputError> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("\n{} ", prompt.bold().yellow()).as_bytes())
            .await?;
        stdout.flush().await?;

        let mut lines = self.lines.lock().await;
        match lines.next_line().await? {
            Some(line) => Ok(line),
            None => Err(InputError::Closed),
        }
    }
}
