//! Rostrum CLI - run multi-agent debates from the terminal
//!
//! # Usage
//!
//! ```bash
//! # Watch two models debate the first built-in topic
//! rostrum debate --delegate
//!
//! # Argue the con side yourself
//! rostrum debate --topic 2 --side con
//!
//! # List topics
//! rostrum topics
//!
//! # Show version and configuration
//! rostrum info
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;

use commands::{debate, info, topics};

/// Rostrum - structured debates between language-model agents
///
/// A pro and a con debater argue a topic for a fixed number of turns,
/// a judge gives feedback, and an optional research agent finds sources.
#[derive(Parser)]
#[command(
    name = "rostrum",
    version,
    about = "Rostrum CLI - multi-agent debate",
    long_about = "Rostrum runs a turn-bounded debate between two agents, either of\n\
                  which you can play, then asks a judge for feedback. With\n\
                  EXA_API_KEY set, a research agent collects sources you can\n\
                  question afterwards."
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log every prompt and reply
    #[arg(long, global = true, env = "ROSTRUM_DEBUG")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a debate session
    #[command(name = "debate")]
    Debate(debate::DebateArgs),

    /// List debate topics
    #[command(name = "topics")]
    Topics(topics::TopicsArgs),

    /// Show version and configuration
    #[command(name = "info")]
    Info(info::InfoArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    setup_logging(cli.verbose, cli.debug);

    match cli.command {
        Commands::Debate(args) => debate::run(args, cli.debug).await,
        Commands::Topics(args) => topics::run(args),
        Commands::Info(args) => info::run(args),
    }
}

/// Setup logging based on verbosity level; `--debug` implies at least info
fn setup_logging(verbosity: u8, debug: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = match (verbosity, debug) {
        (0, false) => "warn",
        (0, true) | (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// Print a success message with a checkmark
pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message with an X
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an info message
pub fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}
