//! analysis-studio - Standalone Binary
//!
//! Edit source code, send it to an analysis backend and inspect the
//! returned diagnostics, context and inferred types.
//!
//! Usage:
//!   analysis-studio [OPTIONS] [FILE]
//!
//! Examples:
//!   analysis-studio program.cl                      # Interactive studio
//!   analysis-studio --headless program.cl           # Analyze once, print results
//!   analysis-studio --backend-url http://host:8000/analyze

use analysis_studio::{
    Controller, FsSourceReader, HttpAnalysisBackend, MemoryEditor, OverlapPolicy, StdoutDisplay,
    StudioApp, StudioConfig,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser)]
#[command(name = "analysis-studio")]
#[command(about = "Edit, run and inspect a source-code analysis backend")]
#[command(version)]
struct Args {
    /// Source file to load on start
    file: Option<PathBuf>,

    /// Analysis endpoint (overrides config)
    #[arg(long, env = "STUDIO_BACKEND_URL")]
    backend_url: Option<String>,

    /// Per-request timeout in seconds (overrides config)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Config file (defaults to the per-user config if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// How overlapping runs and loads are handled (overrides config)
    #[arg(long)]
    overlap: Option<Overlap>,

    /// Analyze once and print the results instead of opening the UI
    #[arg(long)]
    headless: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write logs to this file (the UI otherwise discards them)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

/// Overlap policy options
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Overlap {
    /// Apply every result in completion order
    LastWriterWins,
    /// Cancel pending work when new work starts
    CancelPrevious,
}

impl From<Overlap> for OverlapPolicy {
    fn from(overlap: Overlap) -> Self {
        match overlap {
            Overlap::LastWriterWins => OverlapPolicy::LastWriterWins,
            Overlap::CancelPrevious => OverlapPolicy::CancelPrevious,
        }
    }
}

fn init_logging(args: &Args) -> Result<()> {
    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::new(format!(
        "analysis_studio={},reqwest=warn,hyper=warn",
        level.as_str().to_lowercase()
    ));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        subscriber.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else if args.headless {
        // Logs to stderr, results to stdout
        subscriber.with_writer(std::io::stderr).init();
    } else {
        subscriber.with_writer(std::io::sink).init();
    }

    Ok(())
}

fn resolve_config(args: &Args) -> Result<StudioConfig> {
    let mut config =
        StudioConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(url) = &args.backend_url {
        config.backend.url = url.clone();
    }
    if let Some(timeout) = args.timeout_secs {
        config.backend.timeout_secs = Some(timeout);
    }
    if let Some(overlap) = args.overlap {
        config.overlap = overlap.into();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

async fn run_headless(config: StudioConfig, file: Option<PathBuf>) -> Result<()> {
    let backend = HttpAnalysisBackend::from_config(&config.backend)
        .context("Failed to create analysis backend")?;

    let mut controller = Controller::new(
        MemoryEditor::default(),
        StdoutDisplay,
        Arc::new(backend),
        Arc::new(FsSourceReader),
    )
    .with_policy(config.overlap);

    controller.analyze_once(file).await;
    Ok(())
}

async fn run_interactive(config: StudioConfig, file: Option<PathBuf>) -> Result<()> {
    let backend = HttpAnalysisBackend::from_config(&config.backend)
        .context("Failed to create analysis backend")?;

    let mut app = StudioApp::new(config, Arc::new(backend), Arc::new(FsSourceReader));

    if let Some(path) = file {
        app.open_file(path);
    }

    app.run().await.context("Studio runtime error")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args)?;
    debug!("analysis-studio v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = resolve_config(&args)?;
    debug!("Using backend: {}", config.backend.url);

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    if args.headless {
        run_headless(config, args.file).await
    } else {
        run_interactive(config, args.file).await?;
        debug!("analysis-studio exiting cleanly");
        Ok(())
    }
}
