//! Topics command - List debate topics
//!
//! Usage:
//! ```bash
//! rostrum topics
//! rostrum topics --topics-file my_topics.json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use std::path::PathBuf;

use rostrum_runtime::TopicCatalog;

/// Arguments for the topics command
#[derive(Args)]
pub struct TopicsArgs {
    /// JSON file of topics ({"topics": [{"name", "pro", "con"}]})
    #[arg(long, env = "ROSTRUM_TOPICS")]
    pub topics_file: Option<PathBuf>,

    /// Show each side's system message
    #[arg(long)]
    pub full: bool,
}

/// Load the catalog from a file, or the built-in one
pub fn load_catalog(path: Option<&PathBuf>) -> Result<TopicCatalog> {
    match path {
        Some(path) => Ok(TopicCatalog::load(path)?),
        None => Ok(TopicCatalog::builtin()),
    }
}

/// Run the topics command
pub fn run(args: TopicsArgs) -> Result<()> {
    let catalog = load_catalog(args.topics_file.as_ref())?;

    println!("{}", "Debate Topics".bold().cyan());
    println!();

    let mut header = vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Topic").fg(Color::Cyan),
    ];
    if args.full {
        header.push(Cell::new("Pro").fg(Color::Green));
        header.push(Cell::new("Con").fg(Color::Red));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(header);

    for (i, topic) in catalog.topics().iter().enumerate() {
        let mut row = vec![Cell::new(i + 1), Cell::new(&topic.name)];
        if args.full {
            row.push(Cell::new(&topic.pro_message));
            row.push(Cell::new(&topic.con_message));
        }
        table.add_row(row);
    }

    println!("{table}");
    println!();
    println!(
        "{} Start one with {}",
        "ℹ".blue(),
        "rostrum debate --topic <#>".green()
    );
    Ok(())
}
