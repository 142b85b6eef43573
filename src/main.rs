//! Daily devotion workflow CLI.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

mod catalog;
mod cli;
mod lm;
mod lookup;
mod reflect;
mod schedule;
mod session;
mod songs;
mod workflow;

use cli::{Command, RootArgs, RunArgs, TodayArgs};
use lm::LmCommand;
use lookup::DevotionLookup;
use reflect::StdinReflection;
use songs::{DisabledSearch, SongSearch, YouTubeSearch};
use workflow::{RunStatus, SilentObserver, Stage, WorkflowObserver, WorkflowOrchestrator};

fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::Today(args) => cmd_today(&args),
        Command::Run(args) => cmd_run(&args),
    }
}

fn cmd_today(args: &TodayArgs) -> Result<()> {
    let lookup = match args.date {
        Some(date) => lookup::retrieve_for_date(&args.catalog, date),
        None => lookup::retrieve_today(&args.catalog, Local::now()),
    };
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&lookup).context("serialize lookup result")?
        );
    } else {
        print_lookup(&lookup);
    }
    if lookup.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_lookup(lookup: &DevotionLookup) {
    match lookup {
        DevotionLookup::Success {
            date,
            day_of_year,
            passages,
            ..
        } => {
            println!("Devotion for {date} (day {day_of_year}):");
            for passage in passages {
                println!("  {}: {}", passage.kind, catalog::format_passage(passage));
            }
        }
        DevotionLookup::NoDevotionScheduled { date, message } => {
            println!("{date}: {message}");
        }
        DevotionLookup::Error { date, message, .. } => {
            eprintln!("{date}: {message}");
        }
    }
}

/// Observer that renders the interactive console transcript: a numbered
/// banner per stage and the artifact text as it lands.
struct ConsoleObserver;

impl WorkflowObserver for ConsoleObserver {
    fn stage_started(&mut self, stage: Stage) {
        let (step, title) = match stage {
            Stage::SummaryReady => (1, "DEVOTION SUMMARY"),
            Stage::ReflectionCollected => (2, "COLLECT YOUR REFLECTION"),
            Stage::ContentReady => (3, "AFFIRMATION & PRAYER"),
            Stage::SongsReady => (4, "WORSHIP SONGS"),
            Stage::Init | Stage::Complete => return,
        };
        println!("\n[STEP {step}/4] {title}");
        println!("{}", "-".repeat(70));
    }

    fn stage_completed(&mut self, stage: Stage, artifact: &str) {
        match stage {
            Stage::SummaryReady | Stage::ContentReady | Stage::SongsReady => {
                println!("{artifact}");
            }
            Stage::ReflectionCollected => {
                println!("Your reflection has been recorded.");
            }
            Stage::Complete => {
                println!("\n{}", "=".repeat(70));
                println!("DEVOTION WORKFLOW COMPLETED");
                println!("{}", "=".repeat(70));
            }
            Stage::Init => {}
        }
    }
}

fn cmd_run(args: &RunArgs) -> Result<()> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let generator = LmCommand::resolve(args.lm.as_deref());
    tracing::info!(command = generator.command(), "using LM command");

    let mut orchestrator = WorkflowOrchestrator::new(args.catalog.clone(), date, &generator);
    let mut reflection = StdinReflection;
    let search: Box<dyn SongSearch> = if args.no_search {
        Box::new(DisabledSearch)
    } else {
        Box::new(YouTubeSearch)
    };

    let result = if args.json {
        let mut observer = SilentObserver;
        orchestrator.run(&mut reflection, search.as_ref(), args.max_songs, &mut observer)
    } else {
        let mut observer = ConsoleObserver;
        orchestrator.run(&mut reflection, search.as_ref(), args.max_songs, &mut observer)
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("serialize workflow result")?
        );
    } else if let Some(message) = &result.error_message {
        eprintln!("Workflow halted: {message}");
    } else {
        let summary = orchestrator.session().summary();
        println!("\nSession actions logged: {}", summary.action_count);
        println!("Workflow completed at {}", result.timestamp);
    }

    if result.status == RunStatus::Error {
        std::process::exit(1);
    }
    Ok(())
}
