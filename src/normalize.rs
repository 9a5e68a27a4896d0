//! Normalization of raw upstream items into uniform [`Document`] values.
//!
//! Rendering is deterministic and performs no I/O: a title line, key-value
//! metadata lines, the body text, and a trailing reference link. Missing
//! optional fields are omitted from the rendered text, except a missing
//! description which renders as a fixed placeholder.

use crate::error::IngestError;
use crate::github::types::{ContentEntry, RawIssue, RawPullRequest};
use crate::models::{Document, DocumentMetadata, RepositoryRef};
use anyhow::Result;

/// Placeholder rendered when an item carries no body text.
pub const NO_DESCRIPTION: &str = "No description provided.";

/// Fallback author login when the upstream item has none.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Fallback title when the upstream item has none.
const UNTITLED: &str = "Untitled";

/// Normalize a raw pull request.
///
/// Fails only when the item number is structurally absent, which well-formed
/// upstream responses never produce.
pub fn pull_request(raw: &RawPullRequest, repo: &RepositoryRef) -> Result<Document> {
    let number = raw.number.ok_or(IngestError::MissingField {
        kind: "pull_request",
        field: "number",
    })?;
    let state = raw.state.as_deref().unwrap_or("unknown");
    let author = author_login(raw.user.as_ref().and_then(|u| u.login.as_deref()));

    let mut lines = vec![
        format!(
            "Pull Request #{}: {}",
            number,
            raw.title.as_deref().unwrap_or(UNTITLED)
        ),
        format!("State: {}", state),
        format!("Author: {}", author),
    ];
    if let Some(ref created) = raw.created_at {
        lines.push(format!("Created: {}", created));
    }
    if let Some(ref updated) = raw.updated_at {
        lines.push(format!("Updated: {}", updated));
    }
    push_body(&mut lines, raw.body.as_deref());
    push_link(&mut lines, raw.html_url.as_deref());

    let metadata = DocumentMetadata::PullRequest {
        url: raw.html_url.clone().unwrap_or_default(),
        number,
        state: state.to_string(),
        author,
        created_at: raw.created_at.clone().unwrap_or_default(),
        updated_at: raw.updated_at.clone().unwrap_or_default(),
        repository: repo.full_name(),
    };

    Ok(Document {
        content: lines.join("\n"),
        metadata,
    })
}

/// Normalize a raw issue.
///
/// Callers filter cross-posted pull requests before normalization, so an
/// issue document never represents a pull request.
pub fn issue(raw: &RawIssue, repo: &RepositoryRef) -> Result<Document> {
    let number = raw.number.ok_or(IngestError::MissingField {
        kind: "issue",
        field: "number",
    })?;
    let state = raw.state.as_deref().unwrap_or("unknown");
    let author = author_login(raw.user.as_ref().and_then(|u| u.login.as_deref()));
    let labels = raw.label_names();

    let mut lines = vec![
        format!(
            "Issue #{}: {}",
            number,
            raw.title.as_deref().unwrap_or(UNTITLED)
        ),
        format!("State: {}", state),
        format!("Author: {}", author),
    ];
    if !labels.is_empty() {
        lines.push(format!("Labels: {}", labels.join(", ")));
    }
    if let Some(ref created) = raw.created_at {
        lines.push(format!("Created: {}", created));
    }
    if let Some(ref updated) = raw.updated_at {
        lines.push(format!("Updated: {}", updated));
    }
    push_body(&mut lines, raw.body.as_deref());
    push_link(&mut lines, raw.html_url.as_deref());

    let metadata = DocumentMetadata::Issue {
        url: raw.html_url.clone().unwrap_or_default(),
        number,
        state: state.to_string(),
        author,
        labels,
        created_at: raw.created_at.clone().unwrap_or_default(),
        updated_at: raw.updated_at.clone().unwrap_or_default(),
        repository: repo.full_name(),
    };

    Ok(Document {
        content: lines.join("\n"),
        metadata,
    })
}

/// Normalize a markdown file entry together with its fetched raw text.
pub fn markdown_file(
    entry: &ContentEntry,
    raw_text: &str,
    repo: &RepositoryRef,
    branch: &str,
) -> Document {
    let size = entry.size.unwrap_or(raw_text.len() as u64);

    let mut lines = vec![
        format!("File: {}", entry.path),
        format!("Branch: {}", branch),
        format!("Size: {} bytes", size),
        String::new(),
        raw_text.to_string(),
    ];
    push_link(&mut lines, entry.html_url.as_deref());

    let metadata = DocumentMetadata::MarkdownFile {
        url: entry.html_url.clone().unwrap_or_default(),
        path: entry.path.clone(),
        name: entry.name.clone(),
        size,
        content_hash: entry.sha.clone(),
        repository: repo.full_name(),
        branch: branch.to_string(),
    };

    Document {
        content: lines.join("\n"),
        metadata,
    }
}

fn author_login(login: Option<&str>) -> String {
    login
        .filter(|l| !l.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string()
}

fn push_body(lines: &mut Vec<String>, body: Option<&str>) {
    lines.push(String::new());
    match body.filter(|b| !b.trim().is_empty()) {
        Some(text) => lines.push(text.to_string()),
        None => lines.push(NO_DESCRIPTION.to_string()),
    }
}

fn push_link(lines: &mut Vec<String>, url: Option<&str>) {
    if let Some(url) = url {
        lines.push(String::new());
        lines.push(format!("Link: {}", url));
    }
}
