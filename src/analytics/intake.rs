//! Intake summary: headline counts and recency of repository activity.

use super::{days_between, parse_timestamp};
use crate::models::Document;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Days within which activity counts as recent, absent an override.
const DEFAULT_RECENCY_WINDOW_DAYS: i64 = 14;

/// Configuration for [`summarize`].
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub recency_window_days: i64,
    /// Instant deltas are computed against; now when absent.
    pub reference_date: Option<DateTime<Utc>>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            recency_window_days: DEFAULT_RECENCY_WINDOW_DAYS,
            reference_date: None,
        }
    }
}

/// Open/closed tallies for one document kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
}

/// Headline intake numbers for one repository snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeSummary {
    pub pull_requests: KindCounts,
    pub issues: KindCounts,
    /// Most recent creation time among open pull requests.
    pub last_open_pr_created_at: Option<DateTime<Utc>>,
    /// Most recent update time across pull requests and issues.
    pub most_recent_activity: Option<DateTime<Utc>>,
    /// Whole days since `most_recent_activity`; negative when the reference
    /// date predates the activity.
    pub days_since_last_activity: Option<i64>,
    pub recent_activity_within_window: bool,
    pub repository: Option<String>,
}

/// Fold pull requests and issues into an [`IntakeSummary`].
pub fn summarize(
    pull_requests: &[Document],
    issues: &[Document],
    config: &SummaryConfig,
) -> IntakeSummary {
    let reference = config.reference_date.unwrap_or_else(Utc::now);

    let last_open_pr_created_at = pull_requests
        .iter()
        .filter(|d| d.is_open())
        .filter_map(|d| parse_timestamp(d.metadata.created_at()))
        .max();

    let most_recent_activity = pull_requests
        .iter()
        .chain(issues)
        .filter_map(|d| parse_timestamp(d.metadata.updated_at()))
        .max();

    let days_since_last_activity =
        most_recent_activity.map(|activity| days_between(activity, reference));

    let recent_activity_within_window = days_since_last_activity
        .map_or(false, |days| days <= config.recency_window_days);

    let repository = pull_requests
        .first()
        .or_else(|| issues.first())
        .and_then(|d| d.metadata.repository())
        .map(str::to_string);

    IntakeSummary {
        pull_requests: count_states(pull_requests),
        issues: count_states(issues),
        last_open_pr_created_at,
        most_recent_activity,
        days_since_last_activity,
        recent_activity_within_window,
        repository,
    }
}

fn count_states(documents: &[Document]) -> KindCounts {
    let mut counts = KindCounts {
        total: documents.len(),
        ..Default::default()
    };
    for document in documents {
        if document.is_open() {
            counts.open += 1;
        } else {
            counts.closed += 1;
        }
    }
    counts
}
