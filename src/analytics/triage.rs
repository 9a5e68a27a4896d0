//! Issue triage snapshot: bucket open issues by label urgency.
//!
//! Buckets follow a strict first-match precedence (blockers, onboarding,
//! security, then everything else), so an issue lands in exactly one bucket
//! no matter how many keyword lists its labels match.

use crate::models::Document;
use serde::Serialize;

/// Guidance surfaced when open blockers exist.
const ACTION_BLOCKERS: &str =
    "Open blocker issues need attention before anything else.";

/// Guidance surfaced when nothing is blocking.
const ACTION_NO_BLOCKERS: &str =
    "No blockers; work through onboarding and security items next.";

fn default_blocker_keywords() -> Vec<String> {
    vec!["blocker", "critical", "p0", "urgent"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_onboarding_keywords() -> Vec<String> {
    vec!["good first issue", "starter", "help wanted"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_security_keywords() -> Vec<String> {
    vec!["security", "vulnerability", "cve"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Configuration for [`triage`]; keyword matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    pub blocker_keywords: Vec<String>,
    pub onboarding_keywords: Vec<String>,
    pub security_keywords: Vec<String>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            blocker_keywords: default_blocker_keywords(),
            onboarding_keywords: default_onboarding_keywords(),
            security_keywords: default_security_keywords(),
        }
    }
}

/// One open issue as carried in a triage bucket.
#[derive(Debug, Clone, Serialize)]
pub struct TriageIssue {
    pub number: u64,
    pub title: String,
    pub labels: Vec<String>,
    pub url: String,
    pub updated_at: String,
}

/// Per-bucket tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub blockers: usize,
    pub onboarding: usize,
    pub security: usize,
    pub other_open: usize,
}

/// Open issues bucketed by urgency.
#[derive(Debug, Clone, Serialize)]
pub struct TriageSnapshot {
    pub counts: BucketCounts,
    /// Sum over all buckets.
    pub open_issues: usize,
    pub blockers: Vec<TriageIssue>,
    pub onboarding: Vec<TriageIssue>,
    pub security: Vec<TriageIssue>,
    pub other_open: Vec<TriageIssue>,
    pub suggested_action: String,
}

/// Bucket open issues by label keywords. Closed issues are dropped before
/// bucketing.
pub fn triage(issues: &[Document], config: &TriageConfig) -> TriageSnapshot {
    let mut blockers = Vec::new();
    let mut onboarding = Vec::new();
    let mut security = Vec::new();
    let mut other_open = Vec::new();

    for document in issues {
        if !document.is_open() {
            continue;
        }
        let labels: Vec<String> = document
            .metadata
            .labels()
            .map(<[String]>::to_vec)
            .unwrap_or_default();

        let entry = TriageIssue {
            number: document.metadata.number().unwrap_or_default(),
            title: document.title().to_string(),
            labels: labels.clone(),
            url: document.metadata.url().unwrap_or_default().to_string(),
            updated_at: document.metadata.updated_at().unwrap_or_default().to_string(),
        };

        if matches_any(&labels, &config.blocker_keywords) {
            blockers.push(entry);
        } else if matches_any(&labels, &config.onboarding_keywords) {
            onboarding.push(entry);
        } else if matches_any(&labels, &config.security_keywords) {
            security.push(entry);
        } else {
            other_open.push(entry);
        }
    }

    let counts = BucketCounts {
        blockers: blockers.len(),
        onboarding: onboarding.len(),
        security: security.len(),
        other_open: other_open.len(),
    };
    let open_issues = counts.blockers + counts.onboarding + counts.security + counts.other_open;

    let suggested_action = if counts.blockers > 0 {
        ACTION_BLOCKERS
    } else {
        ACTION_NO_BLOCKERS
    }
    .to_string();

    TriageSnapshot {
        counts,
        open_issues,
        blockers,
        onboarding,
        security,
        other_open,
        suggested_action,
    }
}

fn matches_any(labels: &[String], keywords: &[String]) -> bool {
    labels.iter().any(|label| {
        let label = label.to_lowercase();
        keywords
            .iter()
            .any(|keyword| label.contains(&keyword.to_lowercase()))
    })
}
