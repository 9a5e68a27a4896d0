//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.repopulse.toml` files.

use crate::analytics::{AttentionConfig, SummaryConfig, TriageConfig};
use crate::models::{FetchOptions, ItemState};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Fetch settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Analytics settings.
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "repopulse_report.md".to_string()
}

/// Ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Item state to fetch: open, closed, or all.
    #[serde(default = "default_state")]
    pub state: String,

    /// Page size for list endpoints (protocol max 100).
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Cap on items fetched per pipeline; unbounded when absent.
    #[serde(default)]
    pub max_results: Option<usize>,

    /// GitHub REST API root.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Branch the markdown tree is read from.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Simultaneous remote calls.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Retries after an initial remote-call failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            state: default_state(),
            per_page: default_per_page(),
            max_results: None,
            api_base_url: default_api_base_url(),
            branch: default_branch(),
            max_concurrency: default_max_concurrency(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_state() -> String {
    "all".to_string()
}

fn default_per_page() -> u32 {
    100
}

fn default_api_base_url() -> String {
    crate::models::DEFAULT_API_BASE_URL.to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_max_concurrency() -> usize {
    crate::governor::DEFAULT_MAX_CONCURRENCY
}

fn default_max_retries() -> usize {
    crate::governor::DEFAULT_MAX_RETRIES
}

/// Analytics settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Days within which activity counts as recent.
    #[serde(default = "default_recency_window_days")]
    pub recency_window_days: i64,

    /// Days without updates before an open pull request counts as stale.
    #[serde(default = "default_stale_after_days")]
    pub stale_after_days: i64,

    /// Number of contributors surfaced in the top list.
    #[serde(default = "default_top_contributor_count")]
    pub top_contributor_count: usize,

    /// Label keywords marking blocking issues.
    #[serde(default = "default_blocker_keywords")]
    pub blocker_keywords: Vec<String>,

    /// Label keywords marking newcomer-friendly issues.
    #[serde(default = "default_onboarding_keywords")]
    pub onboarding_keywords: Vec<String>,

    /// Label keywords marking security issues.
    #[serde(default = "default_security_keywords")]
    pub security_keywords: Vec<String>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            recency_window_days: default_recency_window_days(),
            stale_after_days: default_stale_after_days(),
            top_contributor_count: default_top_contributor_count(),
            blocker_keywords: default_blocker_keywords(),
            onboarding_keywords: default_onboarding_keywords(),
            security_keywords: default_security_keywords(),
        }
    }
}

fn default_recency_window_days() -> i64 {
    14
}

fn default_stale_after_days() -> i64 {
    7
}

fn default_top_contributor_count() -> usize {
    3
}

fn default_blocker_keywords() -> Vec<String> {
    TriageConfig::default().blocker_keywords
}

fn default_onboarding_keywords() -> Vec<String> {
    TriageConfig::default().onboarding_keywords
}

fn default_security_keywords() -> Vec<String> {
    TriageConfig::default().security_keywords
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but
    /// can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".repopulse.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings; only
    /// explicitly provided values override.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(state) = args.state {
            self.fetch.state = ItemState::from(state).to_string();
        }
        if let Some(per_page) = args.per_page {
            self.fetch.per_page = per_page;
        }
        if let Some(max_results) = args.max_results {
            self.fetch.max_results = Some(max_results);
        }
        if let Some(ref api_url) = args.api_url {
            self.fetch.api_base_url = api_url.clone();
        }
        if let Some(ref branch) = args.branch {
            self.fetch.branch = branch.clone();
        }
        if let Some(days) = args.stale_after_days {
            self.analytics.stale_after_days = days;
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Build the engine options for one ingestion call.
    pub fn fetch_options(&self, access_token: Option<String>) -> Result<FetchOptions> {
        let state = self
            .fetch
            .state
            .parse::<ItemState>()
            .map_err(|e| anyhow::anyhow!("Invalid state in configuration: {}", e))?;

        Ok(FetchOptions {
            access_token,
            state,
            per_page: self.fetch.per_page,
            max_results: self.fetch.max_results,
            api_base_url: self.fetch.api_base_url.clone(),
            branch: self.fetch.branch.clone(),
            max_concurrency: self.fetch.max_concurrency,
            max_retries: self.fetch.max_retries,
        })
    }

    /// Intake summary configuration.
    pub fn summary_config(&self) -> SummaryConfig {
        SummaryConfig {
            recency_window_days: self.analytics.recency_window_days,
            reference_date: None,
        }
    }

    /// Attention insights configuration.
    pub fn attention_config(&self) -> AttentionConfig {
        AttentionConfig {
            stale_after_days: self.analytics.stale_after_days,
            top_contributor_count: self.analytics.top_contributor_count,
            reference_date: None,
        }
    }

    /// Triage configuration.
    pub fn triage_config(&self) -> TriageConfig {
        TriageConfig {
            blocker_keywords: self.analytics.blocker_keywords.clone(),
            onboarding_keywords: self.analytics.onboarding_keywords.clone(),
            security_keywords: self.analytics.security_keywords.clone(),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fetch.state, "all");
        assert_eq!(config.fetch.per_page, 100);
        assert!(config.fetch.max_results.is_none());
        assert_eq!(config.fetch.branch, "main");
        assert_eq!(config.analytics.stale_after_days, 7);
        assert!(config
            .analytics
            .blocker_keywords
            .contains(&"p0".to_string()));
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "snapshot.md"
verbose = true

[fetch]
state = "open"
per_page = 50
max_results = 200
branch = "develop"

[analytics]
stale_after_days = 14
blocker_keywords = ["showstopper"]
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "snapshot.md");
        assert!(config.general.verbose);
        assert_eq!(config.fetch.state, "open");
        assert_eq!(config.fetch.per_page, 50);
        assert_eq!(config.fetch.max_results, Some(200));
        assert_eq!(config.fetch.branch, "develop");
        assert_eq!(config.analytics.stale_after_days, 14);
        assert_eq!(config.analytics.blocker_keywords, vec!["showstopper"]);
        // Unspecified sections keep their defaults.
        assert_eq!(config.fetch.max_concurrency, 2);
        assert_eq!(config.analytics.recency_window_days, 14);
    }

    #[test]
    fn test_fetch_options_conversion() {
        let mut config = Config::default();
        config.fetch.state = "open".to_string();
        config.fetch.max_results = Some(50);

        let options = config.fetch_options(Some("token".to_string())).unwrap();
        assert_eq!(options.state, ItemState::Open);
        assert_eq!(options.max_results, Some(50));
        assert_eq!(options.access_token.as_deref(), Some("token"));
    }

    #[test]
    fn test_fetch_options_rejects_bad_state() {
        let mut config = Config::default();
        config.fetch.state = "merged".to_string();
        assert!(config.fetch_options(None).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[fetch]"));
        assert!(toml_str.contains("[analytics]"));
    }
}
