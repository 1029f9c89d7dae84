//! NSW departures CLI
//!
//! Polls the Transport for NSW departure monitor for the configured
//! stations and stops and publishes the results as JSON lines.

#![allow(clippy::print_stdout)]

mod summary;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use application::{PollOutcome, ResultPublisher};
use clap::{Parser, Subcommand};
use infrastructure::{
    AppConfig, JsonLinesSink, LoggingConfig, SnapshotFileSink, build_poll_service, init_logging,
    spawn_departure_polling_task,
};
use tokio::sync::watch;
use tracing::{info, warn};

/// NSW departures CLI
#[derive(Parser)]
#[command(name = "nsw-departures")]
#[command(author, version, about = "Transport for NSW departure monitor", long_about = None)]
struct Cli {
    /// Verbosity level, overrides the configured log filter
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, env = "NSW_TRANSPORT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll continuously and print every outcome as a JSON line
    ///
    /// Example: nsw-departures run --output ./departures.json
    Run {
        /// Also keep the latest outcome in this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Run a single poll tick and print the outcome
    Once {
        /// Print a human-readable summary instead of JSON
        #[arg(short, long)]
        summary: bool,

        /// Pretty-print JSON
        #[arg(long, conflicts_with = "summary")]
        pretty: bool,
    },

    /// Validate the configuration and list the monitored trips
    CheckConfig,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Logging settings after applying `-v`
fn effective_logging(config: &LoggingConfig, verbose: u8) -> LoggingConfig {
    if verbose == 0 {
        return config.clone();
    }
    LoggingConfig {
        filter: log_filter_from_verbosity(verbose).to_string(),
        ..config.clone()
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => AppConfig::load()?,
    };
    Ok(config)
}

fn to_json(outcome: &PollOutcome, pretty: bool) -> anyhow::Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(outcome)?
    } else {
        serde_json::to_string(outcome)?
    })
}

async fn run(config: &AppConfig, output: Option<PathBuf>, pretty: bool) -> anyhow::Result<()> {
    let mut publisher = ResultPublisher::new().with_sink(Arc::new(JsonLinesSink::stdout().pretty(pretty)));
    if let Some(path) = output {
        info!(path = %path.display(), "Writing latest outcome to file");
        publisher = publisher.with_sink(Arc::new(SnapshotFileSink::new(path)));
    }

    let service = Arc::new(build_poll_service(config, publisher)?);
    let request = Arc::new(config.poll_request()?);

    let (stop, shutdown) = watch::channel(false);
    let handle = spawn_departure_polling_task(service, request, config.update_interval(), shutdown);

    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl-C")?;
    info!("Shutting down");

    if stop.send(true).is_err() {
        warn!("Polling task already stopped");
    }
    handle.await?;
    Ok(())
}

async fn once(config: &AppConfig, summary: bool, pretty: bool) -> anyhow::Result<()> {
    let service = build_poll_service(config, ResultPublisher::new())?;
    let outcome = service.tick(&config.poll_request()?).await;

    if summary {
        print!("{}", summary::render(&outcome));
    } else {
        println!("{}", to_json(&outcome, pretty)?);
    }

    match outcome {
        PollOutcome::Data(_) => Ok(()),
        PollOutcome::Error(message) => anyhow::bail!("poll failed: {message}"),
    }
}

fn check_config(config: &AppConfig) -> anyhow::Result<()> {
    config.validate()?;

    println!(
        "Configuration OK: {} trip(s), polling every {}s, default cap {}",
        config.trips.len(),
        config.update_interval_secs,
        config.default_max_departures
    );
    for trip in &config.trips {
        let key = trip.key()?;
        println!(
            "  {key}: {} {} ({}), max {}",
            trip.kind,
            trip.identifier()?,
            trip.display_name(),
            trip.max_departures_or(config.default_max_departures)
        );
    }
    if !config.exclude_keywords.is_empty() {
        println!("  excluding: {}", config.exclude_keywords.join(", "));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    init_logging(&effective_logging(&config.logging, cli.verbose))?;

    match cli.command {
        Commands::Run { output, pretty } => {
            config.validate()?;
            run(&config, output, pretty).await
        },
        Commands::Once { summary, pretty } => {
            config.validate()?;
            once(&config, summary, pretty).await
        },
        Commands::CheckConfig => check_config(&config),
    }
}
