//! Scorepull main entry point
//!
//! Command-line interface for the competition-results harvester. The two
//! subcommands mirror the two decoupled halves of the pipeline: `crawl`
//! refreshes the local page cache, `extract` turns the cache into upsert
//! statements.

use clap::{Parser, Subcommand};
use scorepull::config::{load_config, Config};
use scorepull::crawler::run_harvest;
use scorepull::parser::run_extract;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Scorepull: an incremental harvester for competition results
#[derive(Parser, Debug)]
#[command(name = "scorepull")]
#[command(version)]
#[command(about = "Harvest competition results into a local cache", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults target the live site)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover events and refresh the local page cache
    Crawl,

    /// Parse cached pages into records and upsert statements
    Extract {
        /// Print the statements as JSON lines instead of just a summary
        #[arg(long)]
        emit: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load configuration, falling back to the built-in defaults
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Crawl => handle_crawl(&config).await?,
        Command::Extract { emit } => handle_extract(config, emit).await?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("scorepull=info,warn"),
            1 => EnvFilter::new("scorepull=debug,info"),
            2 => EnvFilter::new("scorepull=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the crawl subcommand: refresh the cache if the listing changed
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!(site = %config.site.base_url, "Starting harvest");

    let report = run_harvest(config).await?;

    if report.skipped {
        println!(
            "Listing unchanged ({} events), cache left as-is",
            report.events_discovered
        );
    } else {
        println!("Wrote {} files", report.pages_written);
    }

    Ok(())
}

/// Handles the extract subcommand: parse the cache and emit statements
async fn handle_extract(config: Config, emit: bool) -> anyhow::Result<()> {
    tracing::info!(cache = %config.storage.cache_dir, "Starting extract");

    // The extract pass is synchronous filesystem work; keep it off the
    // runtime's worker threads.
    let outcome = tokio::task::spawn_blocking(move || run_extract(&config)).await??;

    if emit {
        for statement in &outcome.statements {
            println!("{}", serde_json::to_string(statement)?);
        }
    }

    println!(
        "Parsed {} pages ({} skipped), {} statements",
        outcome.pages,
        outcome.failures,
        outcome.statements.len()
    );

    Ok(())
}
