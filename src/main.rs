//! portfolio-scout - recurring AI companies across VC portfolios
//!
//! A CLI front end that normalizes a list of portfolio URLs, submits them
//! to the remote analysis service and renders the companies that appear
//! in more than one portfolio.
//!
//! Exit codes:
//!   0 - Analysis succeeded (or --dry-run / --init-config)
//!   1 - Analysis failed, no URLs given, or a runtime/config error

mod cli;
mod client;
mod config;
mod error;
mod input;
mod models;
mod report;
mod session;
mod view;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use client::HttpAnalyzer;
use config::{Config, CONFIG_FILE_NAME};
use models::{AnalysisState, Report, ReportMetadata};
use session::{AnalysisSession, StartOutcome};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("portfolio-scout v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\nError: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .portfolio-scout.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run one analysis end to end. Returns the process exit code.
async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    if args.reads_stdin() {
        debug!("Reading portfolio URLs from stdin");
    }
    let raw = args.read_raw_input()?;
    let urls = input::normalize(&raw);
    info!("{} portfolio URLs after normalization", urls.len());

    if args.dry_run {
        return handle_dry_run(&urls, &config);
    }

    if !view::analyze_enabled(&AnalysisState::Idle, &urls) {
        eprintln!("No portfolio URLs given. Pass URLs as arguments, with --urls-file, or on stdin.");
        return Ok(1);
    }

    let analyzer = HttpAnalyzer::new(config.analyzer_config())?;
    let session = AnalysisSession::new(Arc::new(analyzer));
    let mut state_rx = session.subscribe();

    let started_at = Instant::now();
    let handle = match session.start(urls.clone()) {
        StartOutcome::Started(handle) => handle,
        StartOutcome::AlreadyRunning => bail!("An analysis is already running"),
        StartOutcome::Disposed => bail!("Analysis session is no longer available"),
    };

    let spinner = (!args.quiet).then(|| view::spinner(&session.current_state(), urls.len()));
    state_rx
        .wait_for(|state| state.is_terminal())
        .await
        .context("Analysis session closed before the run resolved")?;
    handle.await.context("Analysis task aborted")?;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let duration = started_at.elapsed().as_secs_f64();
    let state = session.current_state();
    let rendered = view::render_state(&state)
        .with_context(|| format!("Analysis ended in unexpected state: {}", state))?;

    let Some(results) = state.result_set() else {
        eprintln!("{}", rendered);
        return Ok(1);
    };
    println!("{}", rendered);

    if let Some(ref output) = config.report.output {
        let report = Report::new(
            ReportMetadata {
                endpoint: config.endpoint.url.clone(),
                analysis_date: Utc::now(),
                portfolios_submitted: urls.len(),
                duration_seconds: duration,
            },
            urls,
            results,
        );
        let content = match config.report.format {
            OutputFormat::Markdown => report::generate_markdown_report(&report),
            OutputFormat::Json => report::generate_json_report(&report)?,
        };
        report::save_report(&content, output)?;
        println!("Report saved to: {}", output.display());
    }

    info!(
        "Analysis finished in {:.1}s ({} run)",
        duration,
        session.runs_started()
    );
    Ok(0)
}

/// Handle --dry-run: list the normalized URLs and exit.
fn handle_dry_run(urls: &[String], config: &Config) -> Result<i32> {
    if urls.is_empty() {
        println!("No portfolio URLs after normalization.");
    } else {
        println!("Would submit {} URLs to {}:\n", urls.len(), config.endpoint.url);
        for url in urls {
            println!("  {}", url);
        }
    }

    println!("\nDry run complete. No request was made.");
    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
