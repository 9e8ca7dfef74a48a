//! Info command - Show version and configuration
//!
//! Usage:
//! ```bash
//! rostrum info
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use rostrum_core::{ModelConfig, ModelPreset};
use rostrum_llm::RostrumConfig;

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs;

fn status(set: bool) -> colored::ColoredString {
    if set {
        "set".green()
    } else {
        "not set".yellow()
    }
}

/// Run the info command
pub fn run(_args: InfoArgs) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let config = RostrumConfig::from_env();

    println!("{}", "Rostrum - multi-agent debate".bold().cyan());
    println!("{}", "═".repeat(50).cyan());
    println!();

    println!("{}", "Version Information:".bold());
    println!("  {} {}", "CLI Version:".dimmed(), version.green());
    println!();

    println!("{}", "Model Presets:".bold());
    for preset in ModelPreset::all() {
        let model = ModelConfig::preset(preset);
        println!(
            "  {} {:<8} {}",
            "•".cyan(),
            preset.label().green(),
            model.chat_model.dimmed()
        );
    }
    println!();

    println!("{}", "Configuration:".bold());
    println!(
        "  {} {}",
        "OPENAI_API_KEY:".dimmed(),
        status(config.llm.openai_api_key.is_some())
    );
    println!("  {} {}", "OPENAI_BASE_URL:".dimmed(), config.llm.openai_base_url);
    println!("  {} {}", "OLLAMA_URL:".dimmed(), config.llm.ollama_url);
    println!(
        "  {} {}",
        "EXA_API_KEY:".dimmed(),
        status(config.llm.search_available())
    );
    println!(
        "  {} debug={} cache={}",
        "Settings:".dimmed(),
        config.settings.debug,
        config.settings.cache
    );
    println!();

    if !config.llm.search_available() {
        println!(
            "  {} Set EXA_API_KEY (or METAPHOR_API_KEY) to enable web research",
            "ℹ".blue()
        );
        println!();
    }

    Ok(())
}
