//! CLI Command Handlers
//!
//! Implementation of the `replay` and `check-config` commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::adapters::jsonl::{write_signals, JsonLinesBarFeed};
use crate::application::ReplayRunner;
use crate::config::{load_config, Config};
use crate::strategy::TrendDivergenceIndicator;

/// Trend divergence / volume confirmation indicator
#[derive(Parser, Debug)]
#[command(
    name = "trend-divergence",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Trend divergence indicator with volume confirmation",
    long_about = "Replays a bar stream through the trend divergence indicator. Short-term \
                  moves against the long-term trend open an episode, and the volume z-score \
                  decides whether the move is noise or a real change of trend."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a JSON-lines bar file and emit one signal per bar
    Replay(ReplayCmd),

    /// Validate a configuration file
    CheckConfig(CheckConfigCmd),
}

/// Replay bars through the indicator
#[derive(Parser, Debug)]
pub struct ReplayCmd {
    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bar file, one JSON object per line
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Signal output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Override moderate volume threshold
    #[arg(long, value_name = "Z")]
    pub moderate_threshold: Option<f64>,

    /// Override big-jump volume threshold
    #[arg(long, value_name = "Z")]
    pub big_threshold: Option<f64>,

    /// Override output sensitivity
    #[arg(long, value_name = "SCALE")]
    pub sensitivity: Option<f64>,
}

/// Validate configuration
#[derive(Parser, Debug)]
pub struct CheckConfigCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,
}

/// Execute the parsed command
pub fn execute(app: CliApp) -> Result<()> {
    match app.command {
        Command::Replay(cmd) => {
            let config = match &cmd.config {
                Some(path) => load(path)?,
                None => Config::default(),
            };
            init_logging(app.verbose, app.debug, &config.logging.level);
            replay_command(cmd, config)
        }
        Command::CheckConfig(cmd) => {
            let config = load(&cmd.config)?;
            init_logging(app.verbose, app.debug, &config.logging.level);
            check_config_command(cmd, config)
        }
    }
}

fn load(path: &Path) -> Result<Config> {
    load_config(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// RUST_LOG wins, then the command-line flags, then the config file
fn init_logging(verbose: bool, debug: bool, config_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("debug")
        } else if verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new(config_level.to_lowercase())
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn replay_command(cmd: ReplayCmd, config: Config) -> Result<()> {
    let mut params = config.indicator;
    if let Some(moderate) = cmd.moderate_threshold {
        params.moderate_threshold = moderate;
    }
    if let Some(big) = cmd.big_threshold {
        params.big_threshold = big;
    }
    if let Some(sensitivity) = cmd.sensitivity {
        params.sensitivity = sensitivity;
    }

    let indicator = TrendDivergenceIndicator::new(params).context("Invalid indicator parameters")?;
    info!("Using {}", indicator);

    let mut feed = JsonLinesBarFeed::open(&cmd.input)
        .with_context(|| format!("Failed to open bar file {}", cmd.input.display()))?;
    let mut runner = ReplayRunner::new(indicator);
    let report = runner.run(&mut feed).context("Replay aborted")?;

    match &cmd.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_signals(&mut BufWriter::new(file), &report.outputs)?;
        }
        None => {
            let stdout = io::stdout();
            write_signals(&mut stdout.lock(), &report.outputs)?;
        }
    }

    let summary = serde_json::to_string_pretty(&report.summary)?;
    writeln!(io::stderr(), "{}", summary)?;
    Ok(())
}

fn check_config_command(cmd: CheckConfigCmd, config: Config) -> Result<()> {
    println!("{}: OK", cmd.config.display());
    println!("{}", config.indicator);
    println!("warm-up: {} bars", config.indicator.warmup_bars());
    println!("log level: {}", config.logging.level);
    Ok(())
}
