//! Debate command - Run a full debate session
//!
//! Usage:
//! ```bash
//! # Two models argue for four turns, you watch
//! rostrum debate --topic 1 --side pro --delegate --turns 4
//!
//! # You argue the con side against gpt-4
//! rostrum debate --topic "Should remote work be mandatory?" --side con --model gpt-4
//!
//! # Different models per role, then chat with the sources found
//! rostrum debate --pro-model mistral --con-model gpt-4o --doc-chat
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use rostrum_core::{format_transcript, DebateSide, ModelConfig, ModelPreset, ModelSelection};
use rostrum_debate::TerminationReason;
use rostrum_llm::{ProviderRouter, RostrumConfig};
use rostrum_runtime::{
    CapabilityGate, Collaborators, EligibilityPredicate, Session, SessionConfig, SessionReport,
    DEFAULT_RESEARCH_MAX_STEPS,
};

use super::stdin_input::StdinInput;
use super::topics::load_catalog;
use crate::{print_error, print_info, print_success, print_warning};

/// Arguments for the debate command
#[derive(Args)]
pub struct DebateArgs {
    /// Topic number (see `rostrum topics`) or exact topic name
    #[arg(long, short, default_value = "1")]
    pub topic: String,

    /// JSON file of topics to choose from
    #[arg(long, env = "ROSTRUM_TOPICS")]
    pub topics_file: Option<PathBuf>,

    /// Side you take: pro or con
    #[arg(long, short, default_value = "pro")]
    pub side: DebateSide,

    /// Let a model argue your side instead of typing your argument
    #[arg(long, short)]
    pub delegate: bool,

    /// Number of exchanges
    #[arg(long, default_value_t = 4)]
    pub turns: u32,

    /// Run until a side says DONE
    #[arg(long, conflicts_with = "turns")]
    pub unbounded: bool,

    /// Model for every agent: gpt-4o, gpt-4, mistral or mock
    #[arg(long, short, default_value = "gpt-4o")]
    pub model: ModelPreset,

    /// Model for the pro debater (enables per-role models)
    #[arg(long)]
    pub pro_model: Option<ModelPreset>,

    /// Model for the con debater (enables per-role models)
    #[arg(long)]
    pub con_model: Option<ModelPreset>,

    /// Model for the judge (enables per-role models)
    #[arg(long)]
    pub feedback_model: Option<ModelPreset>,

    /// Chat with the documents research found
    #[arg(long)]
    pub doc_chat: bool,

    /// Seconds to wait for your reply
    #[arg(long, env = "ROSTRUM_INPUT_TIMEOUT", default_value_t = 600)]
    pub timeout: u64,

    /// Wall-clock limit on the debate, in seconds
    #[arg(long)]
    pub max_duration: Option<u64>,

    /// Step budget for the research agent
    #[arg(long, default_value_t = DEFAULT_RESEARCH_MAX_STEPS)]
    pub research_steps: u32,

    /// Cache model responses for identical requests
    #[arg(long)]
    pub cache: bool,
}

impl DebateArgs {
    fn models(&self) -> ModelSelection {
        let shared = ModelConfig::preset(self.model);
        if self.pro_model.is_none() && self.con_model.is_none() && self.feedback_model.is_none() {
            return ModelSelection::Shared(shared);
        }

        let pick = |preset: Option<ModelPreset>| preset.map(ModelConfig::preset).unwrap_or_else(|| shared.clone());
        ModelSelection::PerRole {
            pro: pick(self.pro_model),
            con: pick(self.con_model),
            feedback: pick(self.feedback_model),
        }
    }
}

/// `--doc-chat` opts every topic in or out; the topic itself is not inspected
fn doc_chat_gate(enabled: bool) -> Arc<dyn EligibilityPredicate> {
    Arc::new(move |_topic: &str| enabled)
}

/// Run the debate command
pub async fn run(args: DebateArgs, debug: bool) -> Result<()> {
    let mut config = RostrumConfig::from_env();
    config.settings.debug |= debug;
    config.settings.cache |= args.cache;

    let catalog = load_catalog(args.topics_file.as_ref())?;
    let topic = catalog
        .select(&args.topic)
        .context("Run `rostrum topics` to list available topics")?
        .clone();
    debug!(topic = %topic.name, catalog = catalog.len(), "Selected topic");

    let session_config = SessionConfig {
        llm_delegate: args.delegate,
        turns: (!args.unbounded).then_some(args.turns),
        models: args.models(),
        settings: config.settings,
        input_timeout: Duration::from_secs(args.timeout),
        max_debate_duration: args.max_duration.map(Duration::from_secs),
        research_max_steps: args.research_steps,
        ..SessionConfig::new(topic, args.side)
    };

    let doc_chat = args.doc_chat;
    let search = CapabilityGate::from_config(&config.llm);
    let collaborators = Collaborators::new(
        Arc::new(ProviderRouter::new(config.llm.clone(), config.settings)),
        Arc::new(StdinInput::new()),
        search,
    )
    .with_eligibility(doc_chat_gate(doc_chat));

    println!(
        "{} {} ({} side{})",
        "Debate:".bold().cyan(),
        session_config.topic.name.bold(),
        session_config.side,
        if session_config.llm_delegate { ", delegated" } else { "" }
    );
    if doc_chat && !config.llm.search_available() {
        print_warning("--doc-chat needs EXA_API_KEY; research and document chat are disabled");
    }

    let report = Session::new(session_config, collaborators).run().await?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &SessionReport) {
    println!();
    println!("{}", "Transcript".bold().cyan());
    println!("{}", "═".repeat(50).cyan());
    println!("{}", format_transcript(&report.judged));
    println!();

    let debate = &report.debate;
    let summary = format!(
        "{} exchange(s), ended: {}, last speaker: {}",
        debate.cycles_completed,
        debate.termination.label(),
        debate.last_speaker
    );
    match debate.termination {
        TerminationReason::CollaboratorFault => {
            print_error(&summary);
            if let Some(fault) = &debate.fault {
                print_error(fault);
            }
        }
        TerminationReason::NoResponse | TerminationReason::Timeout => print_warning(&summary),
        _ => print_success(&summary),
    }
    if debate.alternation_interrupted {
        print_warning("The opening side ended mid-exchange; the other side did not get a reply");
    }

    println!();
    println!("{}", "Feedback".bold().cyan());
    println!("{}", "═".repeat(50).cyan());
    match &report.feedback {
        Ok(feedback) => {
            if feedback.degraded {
                print_warning("No arguments were recorded; the judge saw an empty transcript");
            }
            println!("{}", feedback.judgment);
        }
        Err(e) => print_error(&format!("Feedback failed: {}", e)),
    }

    if let Some(research) = &report.research {
        println!();
        println!("{}", "Sources".bold().cyan());
        println!("{}", "═".repeat(50).cyan());
        if research.references.is_empty() {
            print_info("Research found no sources");
        }
        for url in &research.references {
            println!("  {} {}", "•".cyan(), url.underline());
        }
        if let Some(fault) = &research.fault {
            print_error(&format!("Research stopped early: {}", fault));
        }
    }

    if let Some(doc_qa) = &report.doc_qa {
        println!();
        print_info(&format!(
            "Answered {} question(s) over {} document(s)",
            doc_qa.questions_answered, doc_qa.documents
        ));
        if let Some(fault) = &doc_qa.fault {
            print_error(&format!("Document chat stopped: {}", fault));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_chat_gate_ignores_topic() {
        for topic in ["Should remote work be mandatory?", ""] {
            assert!(doc_chat_gate(true).is_eligible(topic));
            assert!(!doc_chat_gate(false).is_eligible(topic));
        }
    }
}
