//! Songbridge main entry point
//!
//! This is the command-line interface for resolving a music link into video
//! links.

use anyhow::Context;
use clap::Parser;
use songbridge::config::{apply_env_overrides, load_config, validate, Config};
use songbridge::output::{render, summary_line};
use songbridge::{Resolution, Resolver};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Songbridge: find videos for music links
///
/// Accepts a track, album or playlist link from Apple Music or Spotify and
/// prints a matching video link for every track. Collections are resolved
/// concurrently, up to the fan-out limit.
#[derive(Parser, Debug)]
#[command(name = "songbridge")]
#[command(version)]
#[command(about = "Find videos for music links", long_about = None)]
struct Cli {
    /// Track, album or playlist URL
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of collection members to resolve
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Resolve collection members one at a time, in page order
    #[arg(long)]
    sequential: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let resolver = Resolver::new(config).context("Failed to initialize resolver")?;

    let resolution = match resolver.run(&cli.url).await {
        Ok(resolution) => resolution,
        Err(e) => {
            tracing::error!("Error resolving {}: {}", cli.url, e);
            return Err(e.into());
        }
    };

    if let Resolution::Collection(report) = &resolution {
        tracing::info!("{}", summary_line(report));
    }
    print!("{}", render(&resolution));

    Ok(())
}

/// Loads the configuration and layers environment and flag overrides on top
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };

    apply_env_overrides(&mut config);

    if let Some(limit) = cli.limit {
        config.resolver.fan_out_limit = limit;
    }
    if cli.sequential {
        config.resolver.sequential = true;
    }

    validate(&config)?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the rendered links.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("songbridge=info,warn"),
            1 => EnvFilter::new("songbridge=debug,info"),
            2 => EnvFilter::new("songbridge=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
