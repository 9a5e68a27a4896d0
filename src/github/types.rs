//! Serde representations of the GitHub REST payloads the engine consumes.
//!
//! Only the fields the normalizer and analytics read are modeled; the rest
//! of each upstream payload is ignored. Fields the API may omit are
//! `Option` so a sparse item deserializes instead of failing the page.

use serde::Deserialize;

/// Author attached to pull requests and issues.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub login: Option<String>,
}

/// Label attached to an issue.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLabel {
    pub name: Option<String>,
}

/// One element of the pull-request listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPullRequest {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub state: Option<String>,
    pub body: Option<String>,
    pub user: Option<RawUser>,
    pub html_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// One element of the issues listing endpoint.
///
/// The issues endpoint also returns pull requests; those carry a
/// `pull_request` key and are filtered out before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIssue {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub state: Option<String>,
    pub body: Option<String>,
    pub user: Option<RawUser>,
    pub labels: Option<Vec<RawLabel>>,
    pub html_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub pull_request: Option<serde_json::Value>,
}

impl RawIssue {
    /// True when the listed item is actually a pull request.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Label names in upstream order, skipping unnamed labels.
    pub fn label_names(&self) -> Vec<String> {
        self.labels
            .iter()
            .flatten()
            .filter_map(|label| label.name.clone())
            .collect()
    }
}

/// One entry of a contents-directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    /// Blob hash of the entry's content.
    pub sha: String,
    pub size: Option<u64>,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub html_url: Option<String>,
    pub download_url: Option<String>,
}

impl ContentEntry {
    pub fn is_dir(&self) -> bool {
        self.entry_type == "dir"
    }

    /// Regular file whose name ends in `.md`.
    pub fn is_markdown_file(&self) -> bool {
        self.entry_type == "file" && self.name.ends_with(".md")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_pull_request() {
        let raw: RawPullRequest = serde_json::from_str(
            r#"{
                "number": 12,
                "title": "Add caching",
                "state": "open",
                "body": null,
                "user": {"login": "alice"},
                "html_url": "https://github.com/o/r/pull/12",
                "created_at": "2024-05-01T10:00:00Z",
                "updated_at": "2024-05-02T10:00:00Z",
                "draft": false
            }"#,
        )
        .unwrap();

        assert_eq!(raw.number, Some(12));
        assert_eq!(raw.user.unwrap().login.as_deref(), Some("alice"));
        assert!(raw.body.is_none());
    }

    #[test]
    fn test_issue_pull_request_flag() {
        let issue: RawIssue =
            serde_json::from_str(r#"{"number": 3, "state": "open"}"#).unwrap();
        assert!(!issue.is_pull_request());

        let cross_posted: RawIssue = serde_json::from_str(
            r#"{"number": 4, "state": "open", "pull_request": {"url": "x"}}"#,
        )
        .unwrap();
        assert!(cross_posted.is_pull_request());
    }

    #[test]
    fn test_issue_label_names_preserve_order() {
        let issue: RawIssue = serde_json::from_str(
            r#"{"number": 5, "labels": [{"name": "bug"}, {"name": null}, {"name": "p0"}]}"#,
        )
        .unwrap();
        assert_eq!(issue.label_names(), vec!["bug", "p0"]);
    }

    #[test]
    fn test_content_entry_classification() {
        let file: ContentEntry = serde_json::from_str(
            r#"{
                "name": "README.md",
                "path": "README.md",
                "sha": "abc123",
                "size": 420,
                "type": "file",
                "html_url": "https://github.com/o/r/blob/main/README.md",
                "download_url": "https://raw.githubusercontent.com/o/r/main/README.md"
            }"#,
        )
        .unwrap();
        assert!(file.is_markdown_file());
        assert!(!file.is_dir());

        let dir: ContentEntry = serde_json::from_str(
            r#"{"name": "docs", "path": "docs", "sha": "def456", "size": 0, "type": "dir"}"#,
        )
        .unwrap();
        assert!(dir.is_dir());
        assert!(!dir.is_markdown_file());

        let source: ContentEntry = serde_json::from_str(
            r#"{"name": "main.rs", "path": "src/main.rs", "sha": "aaa", "size": 10, "type": "file"}"#,
        )
        .unwrap();
        assert!(!source.is_markdown_file());
    }
}
