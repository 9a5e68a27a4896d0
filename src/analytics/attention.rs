//! Pull-request attention insights: contributor load and stale reviews.

use super::{days_between, parse_timestamp};
use crate::models::Document;
use crate::normalize::UNKNOWN_AUTHOR;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Days without updates before an open pull request counts as stale.
const DEFAULT_STALE_AFTER_DAYS: i64 = 7;

/// Number of contributors surfaced in the top list.
const DEFAULT_TOP_CONTRIBUTOR_COUNT: usize = 3;

/// Guidance surfaced when at least one pull request is stale.
const ACTION_REVIEW_STALE: &str =
    "Review stale pull requests before accepting new work.";

/// Guidance surfaced when nothing is stale.
const ACTION_KEEP_CADENCE: &str =
    "Pull requests are moving; keep the current review cadence.";

/// Configuration for [`analyze_attention`].
#[derive(Debug, Clone)]
pub struct AttentionConfig {
    pub stale_after_days: i64,
    pub top_contributor_count: usize,
    /// Instant staleness is measured against; now when absent.
    pub reference_date: Option<DateTime<Utc>>,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            stale_after_days: DEFAULT_STALE_AFTER_DAYS,
            top_contributor_count: DEFAULT_TOP_CONTRIBUTOR_COUNT,
            reference_date: None,
        }
    }
}

/// One author's pull-request tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributorActivity {
    pub author: String,
    pub pull_requests: usize,
}

/// An open pull request that has sat unchanged past the threshold.
#[derive(Debug, Clone, Serialize)]
pub struct StalePullRequest {
    pub number: u64,
    pub title: String,
    pub updated_at: String,
    pub days_since_update: i64,
}

/// Attention signals derived from the pull-request list.
#[derive(Debug, Clone, Serialize)]
pub struct AttentionInsights {
    pub top_contributors: Vec<ContributorActivity>,
    pub stale_pull_requests: Vec<StalePullRequest>,
    pub suggested_action: String,
}

/// Derive contributor and staleness signals from pull requests.
pub fn analyze_attention(pull_requests: &[Document], config: &AttentionConfig) -> AttentionInsights {
    let reference = config.reference_date.unwrap_or_else(Utc::now);

    // Tallies accumulate in first-encountered order; the stable sort below
    // preserves that order for equal counts.
    let mut contributors: Vec<ContributorActivity> = Vec::new();
    for document in pull_requests {
        let author = document.metadata.author().unwrap_or(UNKNOWN_AUTHOR);
        match contributors.iter_mut().find(|c| c.author == author) {
            Some(entry) => entry.pull_requests += 1,
            None => contributors.push(ContributorActivity {
                author: author.to_string(),
                pull_requests: 1,
            }),
        }
    }
    contributors.sort_by(|a, b| b.pull_requests.cmp(&a.pull_requests));
    contributors.truncate(config.top_contributor_count);

    let mut stale_pull_requests = Vec::new();
    for document in pull_requests {
        if !document.is_open() {
            continue;
        }
        let updated = match parse_timestamp(document.metadata.updated_at()) {
            Some(timestamp) => timestamp,
            None => continue,
        };
        let days_since_update = days_between(updated, reference);
        if days_since_update >= config.stale_after_days {
            stale_pull_requests.push(StalePullRequest {
                number: document.metadata.number().unwrap_or_default(),
                title: document.title().to_string(),
                updated_at: document.metadata.updated_at().unwrap_or_default().to_string(),
                days_since_update,
            });
        }
    }

    let suggested_action = if stale_pull_requests.is_empty() {
        ACTION_KEEP_CADENCE
    } else {
        ACTION_REVIEW_STALE
    }
    .to_string();

    AttentionInsights {
        top_contributors: contributors,
        stale_pull_requests,
        suggested_action,
    }
}
