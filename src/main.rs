use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;

use tool_usage::analyzer::{ScanMode, ScanOptions, ToolUsageAnalyzer};
use tool_usage::logging::init_logging;

#[derive(Parser)]
#[command(name = "tool-usage")]
#[command(about = "Tool invocation auditing for AI agent session transcripts")]
#[command(version = "0.3.0")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Tally structured tool calls per tool
    Tools {
        /// Date token: YYYY-MM-DD, today, yesterday, or all
        #[arg(long)]
        date: Option<String>,
        /// Include the last N days (default: 1)
        #[arg(long)]
        days: Option<i64>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
        /// Include per-session detail in JSON output
        #[arg(long)]
        sessions: bool,
        /// Show per-session breakdown in the report
        #[arg(short, long)]
        verbose: bool,
    },
    /// Scan shell commands for mentions of installed skills
    Skills {
        /// Date token: YYYY-MM-DD, today, yesterday, or all
        #[arg(long)]
        date: Option<String>,
        /// Include the last N days (default: 1)
        #[arg(long)]
        days: Option<i64>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
        /// Show example commands for each matched skill
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    // Bare invocation audits yesterday's leftovers: exact mode, last 1 day
    let options = match cli.command.unwrap_or(Commands::Tools {
        date: None,
        days: None,
        json: false,
        sessions: false,
        verbose: false,
    }) {
        Commands::Tools {
            date,
            days,
            json,
            sessions,
            verbose,
        } => ScanOptions {
            mode: ScanMode::ToolCalls,
            json_output: json,
            verbose,
            include_sessions: sessions,
            date,
            days,
        },
        Commands::Skills {
            date,
            days,
            json,
            verbose,
        } => ScanOptions {
            mode: ScanMode::SkillCommands,
            json_output: json,
            verbose,
            include_sessions: false,
            date,
            days,
        },
    };

    let analyzer = ToolUsageAnalyzer::new();
    match analyzer.run(&options) {
        Ok(_) => Ok(()),
        Err(e) => handle_error(e, options.json_output),
    }
}

fn handle_error(e: anyhow::Error, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::json!({ "error": e.to_string() }));
    } else {
        eprintln!("Error: {}", e);
    }
    process::exit(1);
}
