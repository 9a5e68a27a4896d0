//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::{ItemState, PROTOCOL_MAX_PER_PAGE};
use clap::Parser;
use std::path::PathBuf;

/// Repopulse - GitHub repository activity ingestion and analytics
///
/// Imports pull requests, issues, and markdown documentation from a GitHub
/// repository, normalizes them into uniform documents, and derives
/// maintainer-facing analytics: intake summary, pull-request attention
/// signals, and issue triage buckets.
///
/// Examples:
///   repopulse --repo https://github.com/owner/repo
///   repopulse --owner rust-lang --name rust --state open --max-results 200
///   repopulse --repo https://github.com/owner/repo --format json -o snapshot.json
///   repopulse --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Repository URL to ingest
    ///
    /// Supports HTTPS URLs, SSH remotes, and the owner/repo shorthand.
    /// Not required when using --owner/--name or --init-config.
    #[arg(short, long, value_name = "URL", conflicts_with_all = ["owner", "name"])]
    pub repo: Option<String>,

    /// Repository owner (alternative to --repo, together with --name)
    #[arg(long, value_name = "OWNER", requires = "name")]
    pub owner: Option<String>,

    /// Repository name (alternative to --repo, together with --owner)
    #[arg(long, value_name = "NAME", requires = "owner")]
    pub name: Option<String>,

    /// Personal access token for the GitHub API
    ///
    /// Unauthenticated requests work but hit much lower rate limits.
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Item state to fetch
    #[arg(short, long, value_name = "STATE")]
    pub state: Option<StateFilter>,

    /// Page size for list endpoints (protocol max 100)
    #[arg(long, value_name = "COUNT")]
    pub per_page: Option<u32>,

    /// Cap on items fetched per pipeline
    #[arg(long, value_name = "COUNT")]
    pub max_results: Option<usize>,

    /// GitHub REST API root (for GitHub Enterprise installations)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Branch to read markdown documentation from
    #[arg(short, long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .repopulse.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Days without updates before an open pull request counts as stale
    #[arg(long, value_name = "DAYS")]
    pub stale_after_days: Option<i64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit with code 2 when open blocker issues are found
    ///
    /// Useful for CI pipelines that gate on triage health.
    #[arg(long)]
    pub fail_on_blockers: bool,

    /// Generate a default .repopulse.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// State filter for --state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StateFilter {
    Open,
    Closed,
    All,
}

impl From<StateFilter> for ItemState {
    fn from(filter: StateFilter) -> Self {
        match filter {
            StateFilter::Open => ItemState::Open,
            StateFilter::Closed => ItemState::Closed,
            StateFilter::All => ItemState::All,
        }
    }
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // A repository target is required one way or the other
        let has_pair = self.owner.is_some() && self.name.is_some();
        if self.repo.is_none() && !has_pair {
            return Err("Provide a repository via --repo or --owner/--name".to_string());
        }

        if let Some(per_page) = self.per_page {
            if per_page == 0 || per_page > PROTOCOL_MAX_PER_PAGE {
                return Err(format!(
                    "Per-page must be between 1 and {}",
                    PROTOCOL_MAX_PER_PAGE
                ));
            }
        }

        if let Some(max_results) = self.max_results {
            if max_results == 0 {
                return Err("Max results must be at least 1".to_string());
            }
        }

        if let Some(ref api_url) = self.api_url {
            if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(days) = self.stale_after_days {
            if days < 0 {
                return Err("Stale-after days cannot be negative".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            repo: Some("https://github.com/test/repo".to_string()),
            owner: None,
            name: None,
            token: None,
            state: None,
            per_page: None,
            max_results: None,
            api_url: None,
            branch: None,
            output: None,
            format: OutputFormat::Markdown,
            config: None,
            stale_after_days: None,
            verbose: false,
            quiet: false,
            fail_on_blockers: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_requires_a_target() {
        let mut args = make_args();
        args.repo = None;
        assert!(args.validate().is_err());

        args.owner = Some("o".to_string());
        args.name = Some("r".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_per_page_bounds() {
        let mut args = make_args();
        args.per_page = Some(0);
        assert!(args.validate().is_err());

        args.per_page = Some(101);
        assert!(args.validate().is_err());

        args.per_page = Some(100);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_api_url_scheme() {
        let mut args = make_args();
        args.api_url = Some("ftp://example.com".to_string());
        assert!(args.validate().is_err());

        args.api_url = Some("https://ghe.example.com/api/v3".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.repo = None;
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_state_filter_conversion() {
        assert_eq!(ItemState::from(StateFilter::Open), ItemState::Open);
        assert_eq!(ItemState::from(StateFilter::Closed), ItemState::Closed);
        assert_eq!(ItemState::from(StateFilter::All), ItemState::All);
    }
}
