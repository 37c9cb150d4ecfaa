//! actlog - passive activity recorder and analyzer
//!
//! Records shell commands, processes, logged-in users and open files into a
//! local SQLite store, and reports work sessions, productivity and trends.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/actlog/activity.db (~/.local/share/actlog/activity.db)
//! - Logs: $XDG_STATE_HOME/actlog/actlog.log (~/.local/state/actlog/actlog.log)
//! - Config: $XDG_CONFIG_HOME/actlog/config.toml (~/.config/actlog/config.toml)

mod render;

use actlog_core::analytics::{AnalyticsEngine, EventStatistics};
use actlog_core::collector::{collect_all, PeriodicCollector};
use actlog_core::export::{export_csv, DEFAULT_EXPORT_LIMIT};
use actlog_core::config::CollectionConfig;
use actlog_core::{Config, Database, EventFilter, EventType};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "actlog")]
#[command(about = "Record local activity and analyze work patterns")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every collector once
    Collect,

    /// Collect periodically until Ctrl+C
    Watch {
        /// Seconds between cycles (defaults to collection.interval_secs)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Print the analytics summary
    Report {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List recent events, newest first
    List {
        /// Number of events to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Only events of this type (bash_command, file_access, ...)
        #[arg(short = 't', long = "type")]
        event_type: Option<String>,
    },

    /// Show store totals and top commands/files
    Stats {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Export recent events to CSV
    Export {
        /// Maximum number of events to export
        #[arg(short = 'n', long, default_value_t = DEFAULT_EXPORT_LIMIT)]
        limit: usize,

        /// Output directory (defaults to the current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Delete every recorded event
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Ensure XDG environment variables are set before using core library
    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        actlog_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("actlog starting");

    // Open database at XDG-compliant path
    let db_path = Config::database_path();
    tracing::info!(path = %db_path.display(), "Opening database");

    let db = Database::open(&db_path)
        .context("failed to open database")?
        .with_store_config(config.store.clone());
    db.migrate().context("failed to run database migrations")?;

    match args.command {
        Command::Collect => run_collect(&db, &config),
        Command::Watch { interval } => run_watch(db, &config, interval),
        Command::Report { format } => run_report(&db, &config, format),
        Command::List { limit, event_type } => run_list(&db, limit, event_type),
        Command::Stats { format } => run_stats(&db, format),
        Command::Export { limit, dir } => run_export(&db, limit, dir),
        Command::Clear { yes } => run_clear(&db, yes),
    }
}

/// Run a single collection cycle
fn run_collect(db: &Database, config: &Config) -> Result<()> {
    let mut sink = db;
    let summaries = collect_all(&mut sink, &config.collection);

    for summary in &summaries {
        println!("{:<14} {} new", summary.collector, summary.inserted);
    }
    let total: usize = summaries.iter().map(|s| s.inserted).sum();
    println!("Recorded {} event(s)", total);

    Ok(())
}

/// Run continuous collection
fn run_watch(db: Database, config: &Config, interval: Option<u64>) -> Result<()> {
    // Set up signal handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        eprintln!("\nShutting down...");
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    let interval_secs = interval.unwrap_or(config.collection.interval_secs).max(1);
    let controller = PeriodicCollector::new();
    start_collection(
        &controller,
        Duration::from_secs(interval_secs),
        Arc::new(db),
        config.collection.clone(),
    )?;

    println!(
        "Watch mode active (every {}s). Press Ctrl+C to stop.",
        interval_secs
    );

    while running.load(Ordering::SeqCst) && controller.is_running() {
        thread::sleep(Duration::from_millis(200));
    }

    controller.stop();
    tracing::info!("Watch mode stopped");
    Ok(())
}

/// Start the collection loop on `controller`, failing if it did not start.
fn start_collection(
    controller: &PeriodicCollector,
    interval: Duration,
    db: Arc<Database>,
    collection: CollectionConfig,
) -> Result<()> {
    let started = controller.start(interval, move || {
        let mut sink = &*db;
        let summaries = collect_all(&mut sink, &collection);
        let total: usize = summaries.iter().map(|s| s.inserted).sum();
        if total > 0 {
            let timestamp = chrono::Local::now().format("%H:%M:%S");
            println!("[{}] Recorded {} event(s)", timestamp, total);
        }
    });

    if !started {
        anyhow::bail!("failed to start periodic collection");
    }
    Ok(())
}

fn run_report(db: &Database, config: &Config, format: OutputFormat) -> Result<()> {
    let report = AnalyticsEngine::new(db, config.analytics.clone()).generate_summary_report();

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&report).context("failed to serialize report")?;
            println!("{}", json);
        }
        OutputFormat::Text => print!("{}", render::report(&report)),
    }
    Ok(())
}

fn run_list(db: &Database, limit: usize, event_type: Option<String>) -> Result<()> {
    let mut filter = EventFilter::recent(limit);
    if let Some(tag) = event_type.as_deref() {
        filter = filter.of_type(EventType::from(tag));
    }

    let events = db.query(&filter).context("failed to list events")?;
    if events.is_empty() {
        println!("No events recorded");
        return Ok(());
    }

    for event in &events {
        println!("{}", render::event_line(event));
    }
    Ok(())
}

fn run_stats(db: &Database, format: OutputFormat) -> Result<()> {
    let stats = EventStatistics::compute(db);

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&stats).context("failed to serialize statistics")?;
            println!("{}", json);
        }
        OutputFormat::Text => print!("{}", render::stats(&stats)),
    }
    Ok(())
}

fn run_export(db: &Database, limit: usize, dir: Option<PathBuf>) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };

    let path = export_csv(db, &dir, limit).context("failed to export events")?;
    println!("Exported to {}", path.display());
    Ok(())
}

fn run_clear(db: &Database, yes: bool) -> Result<()> {
    if !yes {
        anyhow::bail!("refusing to delete all events without --yes");
    }

    let deleted = db.delete_all().context("failed to delete events")?;
    println!("Deleted {} event(s)", deleted);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_collection_fails_when_already_running() {
        let db = Database::open_in_memory().unwrap();
        let controller = PeriodicCollector::new();
        assert!(controller.start(Duration::from_secs(60), || {}));

        let result = start_collection(
            &controller,
            Duration::from_secs(60),
            Arc::new(db),
            CollectionConfig::default(),
        );
        assert!(result.is_err());

        controller.stop();
    }
}
