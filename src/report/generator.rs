//! Markdown and JSON rendering of one analyzed snapshot.
//!
//! This module generates the report written to disk after ingestion,
//! combining the intake summary, attention insights, and triage snapshot.

use crate::analytics::{AttentionInsights, IntakeSummary, TriageSnapshot};
use crate::analytics::triage::TriageIssue;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata about the generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// The `owner/name` that was ingested.
    pub repository: String,
    /// Date and time the snapshot was taken.
    pub generated_at: DateTime<Utc>,
    /// Duration of the ingestion in seconds.
    pub duration_seconds: f64,
    /// Number of pull-request documents ingested.
    pub pull_requests: usize,
    /// Number of issue documents ingested.
    pub issues: usize,
    /// Number of markdown documents ingested.
    pub markdown_files: usize,
}

/// The complete activity report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub intake: IntakeSummary,
    pub attention: AttentionInsights,
    pub triage: TriageSnapshot,
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Repopulse Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_intake_section(&report.intake));
    output.push_str(&generate_attention_section(&report.attention));
    output.push_str(&generate_triage_section(&report.triage));
    output.push_str(&generate_footer());

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Repository:** {}\n", metadata.repository));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Documents:** {} pull requests, {} issues, {} markdown files\n",
        metadata.pull_requests, metadata.issues, metadata.markdown_files
    ));
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n\n",
        metadata.duration_seconds
    ));

    section
}

fn generate_intake_section(intake: &IntakeSummary) -> String {
    let mut section = String::new();

    section.push_str("## Intake Summary\n\n");
    section.push_str(&format!(
        "- **Pull Requests:** {} total ({} open, {} closed)\n",
        intake.pull_requests.total, intake.pull_requests.open, intake.pull_requests.closed
    ));
    section.push_str(&format!(
        "- **Issues:** {} total ({} open, {} closed)\n",
        intake.issues.total, intake.issues.open, intake.issues.closed
    ));

    if let Some(created) = intake.last_open_pr_created_at {
        section.push_str(&format!(
            "- **Newest open PR:** created {}\n",
            created.format("%Y-%m-%d")
        ));
    }
    match (intake.most_recent_activity, intake.days_since_last_activity) {
        (Some(activity), Some(days)) => {
            section.push_str(&format!(
                "- **Last activity:** {} ({} days ago)\n",
                activity.format("%Y-%m-%d"),
                days
            ));
        }
        _ => section.push_str("- **Last activity:** none recorded\n"),
    }
    let recency = if intake.recent_activity_within_window {
        "active within the recency window"
    } else {
        "quiet beyond the recency window"
    };
    section.push_str(&format!("- **Recency:** {}\n\n", recency));

    section
}

fn generate_attention_section(attention: &AttentionInsights) -> String {
    let mut section = String::new();

    section.push_str("## Pull Request Attention\n\n");

    section.push_str("### Top Contributors\n\n");
    if attention.top_contributors.is_empty() {
        section.push_str("No pull request authors recorded.\n\n");
    } else {
        for contributor in &attention.top_contributors {
            section.push_str(&format!(
                "- **{}**: {} pull request(s)\n",
                contributor.author, contributor.pull_requests
            ));
        }
        section.push('\n');
    }

    section.push_str("### Stale Pull Requests\n\n");
    if attention.stale_pull_requests.is_empty() {
        section.push_str("None.\n\n");
    } else {
        for stale in &attention.stale_pull_requests {
            section.push_str(&format!(
                "- #{} {}: {} days since update (last: {})\n",
                stale.number, stale.title, stale.days_since_update, stale.updated_at
            ));
        }
        section.push('\n');
    }

    section.push_str(&format!("> {}\n\n", attention.suggested_action));

    section
}

fn generate_triage_section(triage: &TriageSnapshot) -> String {
    let mut section = String::new();

    section.push_str("## Issue Triage\n\n");
    section.push_str(&format!(
        "{} open issue(s): {} blocker(s), {} onboarding, {} security, {} other\n\n",
        triage.open_issues,
        triage.counts.blockers,
        triage.counts.onboarding,
        triage.counts.security,
        triage.counts.other_open
    ));

    section.push_str(&generate_bucket("Blockers", &triage.blockers));
    section.push_str(&generate_bucket("Onboarding", &triage.onboarding));
    section.push_str(&generate_bucket("Security", &triage.security));
    section.push_str(&generate_bucket("Other Open", &triage.other_open));

    section.push_str(&format!("> {}\n\n", triage.suggested_action));

    section
}

fn generate_bucket(title: &str, entries: &[TriageIssue]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut section = format!("### {}\n\n", title);
    for entry in entries {
        let labels = if entry.labels.is_empty() {
            String::new()
        } else {
            format!(" [{}]", entry.labels.join(", "))
        };
        section.push_str(&format!("- #{} {}{}\n", entry.number, entry.title, labels));
    }
    section.push('\n');

    section
}

fn generate_footer() -> String {
    format!(
        "---\n\n*Generated by Repopulse v{}*\n",
        env!("CARGO_PKG_VERSION")
    )
}
