//! Repopulse - GitHub Repository Activity Analyzer
//!
//! A CLI tool that ingests pull requests, issues, and markdown
//! documentation from a GitHub repository and derives maintainer-facing
//! analytics from the normalized snapshot.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad reference, network failure, config error)
//!   2 - Open blocker issues found with --fail-on-blockers

mod analytics;
mod cli;
mod config;
mod error;
mod github;
mod governor;
mod ingest;
mod models;
mod normalize;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use models::RepositoryRef;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Repopulse v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the ingestion and analytics
    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .repopulse.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".repopulse.toml");

    if path.exists() {
        eprintln!("⚠️  .repopulse.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .repopulse.toml")?;

    println!("✅ Created .repopulse.toml with default settings.");
    println!("   Edit it to customize fetch limits, branch, and triage keywords.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete workflow. Returns exit code (0 or 2).
async fn run(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Step 1: Resolve the repository reference (no network yet)
    let repo = resolve_repository(&args)?;
    let options = config.fetch_options(args.token.clone())?;

    println!("📥 Ingesting repository: {}", repo.full_name());
    println!("   API: {}", options.api_base_url);
    println!(
        "   State: {} | Branch: {} | Page size: {}",
        options.state,
        options.branch,
        options.per_page_clamped()
    );
    if let Some(cap) = options.max_results {
        println!("   Max results per pipeline: {}", cap);
    }
    if options.access_token.is_none() {
        warn!("No access token supplied; unauthenticated rate limits apply");
    }

    // Step 2: Ingest the snapshot
    let spinner = make_spinner(&args);
    let result = ingest::ingest(&repo, &options).await;
    if let Some(ref pb) = spinner {
        pb.finish_and_clear();
    }
    let snapshot = result?;

    println!(
        "   Fetched {} documents ({} pull requests, {} issues, {} markdown files)",
        snapshot.total(),
        snapshot.pull_requests.len(),
        snapshot.issues.len(),
        snapshot.markdown_files.len()
    );

    // Step 3: Derive the analytics
    println!("\n🔬 Deriving analytics...");
    let intake = analytics::summarize(
        &snapshot.pull_requests,
        &snapshot.issues,
        &config.summary_config(),
    );
    let attention = analytics::analyze_attention(&snapshot.pull_requests, &config.attention_config());
    let triage = analytics::triage(&snapshot.issues, &config.triage_config());

    // Step 4: Build and save the report
    println!("📝 Generating report...");

    let metadata = report::ReportMetadata {
        repository: repo.full_name(),
        generated_at: Utc::now(),
        duration_seconds: start_time.elapsed().as_secs_f64(),
        pull_requests: snapshot.pull_requests.len(),
        issues: snapshot.issues.len(),
        markdown_files: snapshot.markdown_files.len(),
    };
    let report = report::Report {
        metadata,
        intake,
        attention,
        triage,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    let output_path = PathBuf::from(&config.general.output);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    println!("\n📊 Snapshot Summary:");
    println!(
        "   Pull requests: {} open / {} total | Issues: {} open / {} total",
        report.intake.pull_requests.open,
        report.intake.pull_requests.total,
        report.intake.issues.open,
        report.intake.issues.total
    );
    println!(
        "   Stale PRs: {} | Blockers: {}",
        report.attention.stale_pull_requests.len(),
        report.triage.counts.blockers
    );
    if let Some(days) = report.intake.days_since_last_activity {
        println!("   Last activity: {} day(s) ago", days);
    }
    println!("   Duration: {:.1}s", report.metadata.duration_seconds);
    println!(
        "\n✅ Ingest complete! Report saved to: {}",
        output_path.display()
    );

    // Check --fail-on-blockers threshold
    if args.fail_on_blockers && report.triage.counts.blockers > 0 {
        eprintln!(
            "\n⛔ {} open blocker issue(s) found. Failing (exit code 2).",
            report.triage.counts.blockers
        );
        return Ok(2);
    }

    Ok(0)
}

/// Resolve the repository reference from CLI arguments.
fn resolve_repository(args: &Args) -> Result<RepositoryRef> {
    if let (Some(owner), Some(name)) = (&args.owner, &args.name) {
        return Ok(RepositoryRef::new(owner, name)?);
    }

    let url = args.repo.as_deref().unwrap_or("");
    Ok(RepositoryRef::parse(url)?)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .repopulse.toml");
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

/// Spinner shown while the fetch pipelines run.
fn make_spinner(args: &Args) -> Option<ProgressBar> {
    if args.quiet {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message("Fetching pull requests, issues, and markdown docs...");
    pb.enable_steady_tick(Duration::from_millis(120));
    Some(pb)
}
