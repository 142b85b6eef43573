//! CLI argument parsing for the devotion workflow.
//!
//! The CLI stays thin: it wires dates, paths, and collaborator configuration
//! without embedding workflow policy, so the same core logic can be reused
//! elsewhere.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default catalog location, relative to the working directory.
pub const DEFAULT_CATALOG_PATH: &str = "data/devotion.json";

/// Root CLI entrypoint for the devotion workflow.
#[derive(Parser, Debug)]
#[command(
    name = "devotion",
    version,
    about = "Daily devotion workflow: passages, reflection, prayer, songs",
    after_help = "Commands:\n  today  Resolve a date and print its scheduled passages\n  run    Run the full five-stage devotion workflow\n\nExamples:\n  devotion today\n  devotion today --date 2025-03-01 --json\n  devotion run --catalog data/devotion.json\n  devotion run --lm 'claude --print' --max-songs 5 --no-search",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Today(TodayArgs),
    Run(RunArgs),
}

/// Inputs for the passage lookup command.
#[derive(Parser, Debug)]
#[command(about = "Resolve a date and print its scheduled passages")]
pub struct TodayArgs {
    /// Path to the passage catalog JSON
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CATALOG_PATH)]
    pub catalog: PathBuf,

    /// Resolve this date instead of today (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Inputs for the full workflow run.
#[derive(Parser, Debug)]
#[command(about = "Run the full five-stage devotion workflow")]
pub struct RunArgs {
    /// Path to the passage catalog JSON
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CATALOG_PATH)]
    pub catalog: PathBuf,

    /// Run for this date instead of today (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// LM command for the generation stages (overrides DEVOTION_LM_COMMAND)
    #[arg(long, value_name = "CMD")]
    pub lm: Option<String>,

    /// Maximum verified song links to request from search
    #[arg(long, value_name = "N", default_value_t = 5)]
    pub max_songs: usize,

    /// Skip the live song search and keep generated recommendations only
    #[arg(long)]
    pub no_search: bool,

    /// Emit the final workflow result as JSON (suppresses the transcript)
    #[arg(long)]
    pub json: bool,
}
