//! Data models for the ingestion engine.
//!
//! This module contains the core data structures shared across the
//! application: repository references, fetch options, normalized documents,
//! and the aggregated snapshot.

use crate::error::IngestError;
use crate::governor::{DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_RETRIES};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Protocol maximum page size for GitHub list endpoints.
pub const PROTOCOL_MAX_PER_PAGE: u32 = 100;

/// Default public GitHub REST API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// A repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Account or organization that owns the repository.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepositoryRef {
    /// Create a reference from explicit owner and name fields.
    pub fn new(owner: &str, name: &str) -> Result<Self, IngestError> {
        let owner = owner.trim();
        let name = name.trim().trim_end_matches(".git");

        if owner.is_empty() || name.is_empty() {
            return Err(IngestError::InvalidRepositoryReference {
                input: format!("{}/{}", owner, name),
            });
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Parse a reference out of a repository URL.
    ///
    /// Accepts HTTPS URLs (`https://github.com/owner/repo`), SSH remotes
    /// (`git@github.com:owner/repo`), and the bare `owner/repo` shorthand.
    /// A trailing `.git` suffix is ignored. Parsing failure is terminal; no
    /// partial reference is ever produced.
    pub fn parse(input: &str) -> Result<Self, IngestError> {
        let invalid = || IngestError::InvalidRepositoryReference {
            input: input.to_string(),
        };

        let trimmed = input.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(invalid());
        }

        // git@host:owner/repo
        if let Some((head, rest)) = trimmed.split_once(':') {
            if head.contains('@') && !head.contains('/') {
                let mut parts = rest.split('/').filter(|p| !p.is_empty());
                return match (parts.next(), parts.next()) {
                    (Some(owner), Some(name)) => Self::new(owner, name),
                    _ => Err(invalid()),
                };
            }
        }

        // https://host/owner/repo[/...]
        if let Some((_, rest)) = trimmed.split_once("://") {
            let mut parts = rest.split('/').filter(|p| !p.is_empty());
            let _host = parts.next().ok_or_else(invalid)?;
            return match (parts.next(), parts.next()) {
                (Some(owner), Some(name)) => Self::new(owner, name),
                _ => Err(invalid()),
            };
        }

        // owner/repo shorthand
        let parts: Vec<&str> = trimmed.split('/').filter(|p| !p.is_empty()).collect();
        match parts.as_slice() {
            [owner, name] => Self::new(owner, name),
            _ => Err(invalid()),
        }
    }

    /// The `owner/name` form used in metadata and logging.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// State filter for pull request and issue listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Open,
    Closed,
    #[default]
    All,
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemState::Open => write!(f, "open"),
            ItemState::Closed => write!(f, "closed"),
            ItemState::All => write!(f, "all"),
        }
    }
}

impl FromStr for ItemState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(ItemState::Open),
            "closed" => Ok(ItemState::Closed),
            "all" => Ok(ItemState::All),
            other => Err(format!("expected open, closed, or all, got '{}'", other)),
        }
    }
}

/// Options for one ingestion call.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Pre-obtained personal access token; requests go unauthenticated
    /// when absent.
    pub access_token: Option<String>,
    /// State filter for pull requests and issues.
    pub state: ItemState,
    /// Requested page size for list endpoints.
    pub per_page: u32,
    /// Cap on normalized items per pipeline; unbounded when absent.
    pub max_results: Option<usize>,
    /// REST API root; override for GitHub Enterprise installations.
    pub api_base_url: String,
    /// Branch the markdown tree is read from.
    pub branch: String,
    /// Simultaneous remote calls allowed by the governor.
    pub max_concurrency: usize,
    /// Retry attempts after an initial remote-call failure.
    pub max_retries: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            access_token: None,
            state: ItemState::All,
            per_page: PROTOCOL_MAX_PER_PAGE,
            max_results: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            branch: "main".to_string(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl FetchOptions {
    /// Page size clamped to the protocol limits.
    pub fn per_page_clamped(&self) -> u32 {
        self.per_page.clamp(1, PROTOCOL_MAX_PER_PAGE)
    }
}

/// A normalized unit of ingested content.
///
/// `content` is a synthesized human-readable body; `metadata` is the typed
/// record analytics consume. Documents are immutable value records with no
/// identity beyond their metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Title extracted from the synthesized content's header line.
    ///
    /// Header lines render as `Pull Request #1: Title`; everything after the
    /// first `: ` is the title. Falls back to the whole first line.
    pub fn title(&self) -> &str {
        let first = self.content.lines().next().unwrap_or("");
        match first.split_once(": ") {
            Some((_, title)) => title,
            None => first,
        }
    }

    /// True iff the metadata state, lower-cased, equals exactly "open".
    /// Any other value, including absent, counts as closed.
    pub fn is_open(&self) -> bool {
        self.metadata
            .state()
            .map_or(false, |s| s.to_lowercase() == "open")
    }
}

/// Kind-tagged metadata carried by every document.
///
/// Exactly one variant per document kind, each with its own fixed field set.
/// The kind is fixed at creation and never reinterpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentMetadata {
    PullRequest {
        url: String,
        number: u64,
        state: String,
        author: String,
        created_at: String,
        updated_at: String,
        repository: String,
    },
    Issue {
        url: String,
        number: u64,
        state: String,
        author: String,
        labels: Vec<String>,
        created_at: String,
        updated_at: String,
        repository: String,
    },
    MarkdownFile {
        url: String,
        path: String,
        name: String,
        size: u64,
        content_hash: String,
        repository: String,
        branch: String,
    },
}

impl DocumentMetadata {
    /// Stable kind tag, matching the serialized form.
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentMetadata::PullRequest { .. } => "pull_request",
            DocumentMetadata::Issue { .. } => "issue",
            DocumentMetadata::MarkdownFile { .. } => "markdown_file",
        }
    }

    /// Source URL of the underlying item.
    pub fn url(&self) -> Option<&str> {
        match self {
            DocumentMetadata::PullRequest { url, .. }
            | DocumentMetadata::Issue { url, .. }
            | DocumentMetadata::MarkdownFile { url, .. } => Some(url),
        }
    }

    /// Item number; markdown files carry none.
    pub fn number(&self) -> Option<u64> {
        match self {
            DocumentMetadata::PullRequest { number, .. }
            | DocumentMetadata::Issue { number, .. } => Some(*number),
            DocumentMetadata::MarkdownFile { .. } => None,
        }
    }

    /// Upstream state string; markdown files carry none.
    pub fn state(&self) -> Option<&str> {
        match self {
            DocumentMetadata::PullRequest { state, .. }
            | DocumentMetadata::Issue { state, .. } => Some(state),
            DocumentMetadata::MarkdownFile { .. } => None,
        }
    }

    /// Author login; markdown files carry none.
    pub fn author(&self) -> Option<&str> {
        match self {
            DocumentMetadata::PullRequest { author, .. }
            | DocumentMetadata::Issue { author, .. } => Some(author),
            DocumentMetadata::MarkdownFile { .. } => None,
        }
    }

    /// Ordered label names; only issues carry labels.
    pub fn labels(&self) -> Option<&[String]> {
        match self {
            DocumentMetadata::Issue { labels, .. } => Some(labels),
            _ => None,
        }
    }

    /// Creation timestamp as reported upstream.
    pub fn created_at(&self) -> Option<&str> {
        match self {
            DocumentMetadata::PullRequest { created_at, .. }
            | DocumentMetadata::Issue { created_at, .. } => Some(created_at),
            DocumentMetadata::MarkdownFile { .. } => None,
        }
    }

    /// Last-update timestamp as reported upstream.
    pub fn updated_at(&self) -> Option<&str> {
        match self {
            DocumentMetadata::PullRequest { updated_at, .. }
            | DocumentMetadata::Issue { updated_at, .. } => Some(updated_at),
            DocumentMetadata::MarkdownFile { .. } => None,
        }
    }

    /// The `owner/name` the document was ingested from.
    pub fn repository(&self) -> Option<&str> {
        match self {
            DocumentMetadata::PullRequest { repository, .. }
            | DocumentMetadata::Issue { repository, .. }
            | DocumentMetadata::MarkdownFile { repository, .. } => Some(repository),
        }
    }
}

/// The joined result of one ingestion call.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateResult {
    pub pull_requests: Vec<Document>,
    pub issues: Vec<Document>,
    pub markdown_files: Vec<Document>,
    /// Concatenation of the three lists, preserving each sub-list's
    /// internal order.
    pub all: Vec<Document>,
}

impl AggregateResult {
    /// Assemble the result, building the `all` concatenation.
    pub fn new(
        pull_requests: Vec<Document>,
        issues: Vec<Document>,
        markdown_files: Vec<Document>,
    ) -> Self {
        let mut all =
            Vec::with_capacity(pull_requests.len() + issues.len() + markdown_files.len());
        all.extend(pull_requests.iter().cloned());
        all.extend(issues.iter().cloned());
        all.extend(markdown_files.iter().cloned());

        Self {
            pull_requests,
            issues,
            markdown_files,
            all,
        }
    }

    /// Total number of documents across all kinds.
    pub fn total(&self) -> usize {
        self.all.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_https_url() {
        let parsed = RepositoryRef::parse("https://github.com/rust-lang/rust").unwrap();
        assert_eq!(parsed.owner, "rust-lang");
        assert_eq!(parsed.name, "rust");
    }

    #[test]
    fn test_parse_https_url_with_git_suffix() {
        let parsed = RepositoryRef::parse("https://github.com/rust-lang/rust.git").unwrap();
        assert_eq!(parsed.name, "rust");
    }

    #[test]
    fn test_parse_https_url_with_extra_path() {
        let parsed = RepositoryRef::parse("https://github.com/owner/repo/pulls").unwrap();
        assert_eq!(parsed.owner, "owner");
        assert_eq!(parsed.name, "repo");
    }

    #[test]
    fn test_parse_ssh_remote() {
        let parsed = RepositoryRef::parse("git@github.com:owner/repo.git").unwrap();
        assert_eq!(parsed.owner, "owner");
        assert_eq!(parsed.name, "repo");
    }

    #[test]
    fn test_parse_shorthand() {
        let parsed = RepositoryRef::parse("owner/repo").unwrap();
        assert_eq!(parsed.full_name(), "owner/repo");
    }

    #[test]
    fn test_parse_rejects_missing_repo() {
        assert!(RepositoryRef::parse("https://github.com/owner").is_err());
        assert!(RepositoryRef::parse("just-a-name").is_err());
        assert!(RepositoryRef::parse("").is_err());
    }

    #[test]
    fn test_item_state_roundtrip() {
        assert_eq!("open".parse::<ItemState>().unwrap(), ItemState::Open);
        assert_eq!("ALL".parse::<ItemState>().unwrap(), ItemState::All);
        assert!("merged".parse::<ItemState>().is_err());
        assert_eq!(ItemState::Closed.to_string(), "closed");
    }

    #[test]
    fn test_fetch_options_defaults() {
        let options = FetchOptions::default();
        assert_eq!(options.state, ItemState::All);
        assert_eq!(options.per_page, 100);
        assert!(options.max_results.is_none());
        assert_eq!(options.branch, "main");
        assert_eq!(options.max_concurrency, 2);
        assert_eq!(options.max_retries, 2);
    }

    #[test]
    fn test_per_page_clamped() {
        let mut options = FetchOptions::default();
        options.per_page = 500;
        assert_eq!(options.per_page_clamped(), 100);
        options.per_page = 0;
        assert_eq!(options.per_page_clamped(), 1);
    }

    fn doc(content: &str, metadata: DocumentMetadata) -> Document {
        Document {
            content: content.to_string(),
            metadata,
        }
    }

    fn pr_metadata(number: u64, state: &str) -> DocumentMetadata {
        DocumentMetadata::PullRequest {
            url: format!("https://github.com/o/r/pull/{}", number),
            number,
            state: state.to_string(),
            author: "alice".to_string(),
            created_at: "2024-05-01T00:00:00Z".to_string(),
            updated_at: "2024-05-02T00:00:00Z".to_string(),
            repository: "o/r".to_string(),
        }
    }

    #[test]
    fn test_document_title_extraction() {
        let document = doc("Pull Request #7: Fix the parser\nState: open", pr_metadata(7, "open"));
        assert_eq!(document.title(), "Fix the parser");

        let untitled = doc("just a line", pr_metadata(1, "open"));
        assert_eq!(untitled.title(), "just a line");
    }

    #[test]
    fn test_document_open_classification() {
        assert!(doc("x", pr_metadata(1, "open")).is_open());
        assert!(doc("x", pr_metadata(1, "OPEN")).is_open());
        assert!(!doc("x", pr_metadata(1, "closed")).is_open());
        assert!(!doc("x", pr_metadata(1, "")).is_open());
    }

    #[test]
    fn test_aggregate_result_preserves_order() {
        let prs = vec![doc("a", pr_metadata(1, "open")), doc("b", pr_metadata(2, "open"))];
        let issues = vec![doc(
            "c",
            DocumentMetadata::Issue {
                url: String::new(),
                number: 3,
                state: "open".to_string(),
                author: "bob".to_string(),
                labels: vec![],
                created_at: String::new(),
                updated_at: String::new(),
                repository: "o/r".to_string(),
            },
        )];
        let result = AggregateResult::new(prs, issues, vec![]);

        assert_eq!(result.total(), 3);
        let contents: Vec<&str> = result.all.iter().map(|d| d.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
    }
}
