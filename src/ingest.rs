//! Repository aggregation: the top-level ingestion entry point.
//!
//! Runs the pull-request, issue, and markdown pipelines concurrently against
//! one governor and joins them into a single snapshot. The join is
//! fail-fast: the first pipeline failure becomes the call's failure and the
//! sibling pipelines are dropped; no partial result is ever returned.

use crate::github::client::{GitHubClient, RepositoryApi};
use crate::github::paginator::{fetch_issues, fetch_pull_requests};
use crate::github::tree::collect_markdown;
use crate::governor::CallGovernor;
use crate::models::{AggregateResult, FetchOptions, RepositoryRef};
use anyhow::{Context, Result};
use futures::future;
use tracing::info;

/// Ingest one repository snapshot.
///
/// Constructs a fresh HTTP client and governor per call; the engine holds no
/// state across calls.
pub async fn ingest(repo: &RepositoryRef, options: &FetchOptions) -> Result<AggregateResult> {
    info!(
        "Ingesting {} (state={}, branch={})",
        repo.full_name(),
        options.state,
        options.branch
    );

    let client = GitHubClient::new(options)?;
    let governor = CallGovernor::new(options.max_concurrency, options.max_retries);

    let result = run_pipelines(&client, &governor, repo, options)
        .await
        .with_context(|| format!("Failed to ingest {}", repo.full_name()))?;

    info!(
        "Ingested {} documents from {} ({} pull requests, {} issues, {} markdown files)",
        result.total(),
        repo.full_name(),
        result.pull_requests.len(),
        result.issues.len(),
        result.markdown_files.len()
    );
    Ok(result)
}

async fn run_pipelines(
    api: &dyn RepositoryApi,
    governor: &CallGovernor,
    repo: &RepositoryRef,
    options: &FetchOptions,
) -> Result<AggregateResult> {
    let (pull_requests, issues, markdown_files) = future::try_join3(
        fetch_pull_requests(api, governor, repo, options),
        fetch_issues(api, governor, repo, options),
        collect_markdown(api, governor, repo, options),
    )
    .await?;

    Ok(AggregateResult::new(pull_requests, issues, markdown_files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::{ContentEntry, RawIssue, RawPullRequest};
    use anyhow::bail;
    use async_trait::async_trait;

    /// One page of everything; the markdown tree optionally fails.
    struct SmallRepoApi {
        markdown_fails: bool,
    }

    #[async_trait]
    impl RepositoryApi for SmallRepoApi {
        async fn list_pull_requests(
            &self,
            _repo: &RepositoryRef,
            _state: &str,
            _per_page: u32,
            page: u32,
        ) -> Result<Vec<RawPullRequest>> {
            if page > 1 {
                return Ok(vec![]);
            }
            Ok(vec![RawPullRequest {
                number: Some(1),
                title: Some("First".to_string()),
                state: Some("open".to_string()),
                ..Default::default()
            }])
        }

        async fn list_issues(
            &self,
            _repo: &RepositoryRef,
            _state: &str,
            _per_page: u32,
            page: u32,
        ) -> Result<Vec<RawIssue>> {
            if page > 1 {
                return Ok(vec![]);
            }
            Ok(vec![
                RawIssue {
                    number: Some(2),
                    state: Some("open".to_string()),
                    ..Default::default()
                },
                RawIssue {
                    number: Some(3),
                    pull_request: Some(serde_json::json!({"url": "x"})),
                    ..Default::default()
                },
            ])
        }

        async fn list_directory(
            &self,
            _repo: &RepositoryRef,
            path: &str,
            _branch: &str,
        ) -> Result<Vec<ContentEntry>> {
            if self.markdown_fails {
                bail!("contents listing unavailable");
            }
            if !path.is_empty() {
                return Ok(vec![]);
            }
            Ok(vec![ContentEntry {
                name: "README.md".to_string(),
                path: "README.md".to_string(),
                sha: "abc".to_string(),
                size: Some(8),
                entry_type: "file".to_string(),
                html_url: None,
                download_url: Some("raw://README.md".to_string()),
            }])
        }

        async fn fetch_raw(&self, _url: &str) -> Result<String> {
            Ok("# Readme".to_string())
        }
    }

    fn repo() -> RepositoryRef {
        RepositoryRef::parse("o/r").unwrap()
    }

    #[tokio::test]
    async fn test_pipelines_join_into_one_snapshot() {
        let api = SmallRepoApi {
            markdown_fails: false,
        };
        let governor = CallGovernor::new(2, 0);
        let result = run_pipelines(&api, &governor, &repo(), &FetchOptions::default())
            .await
            .unwrap();

        assert_eq!(result.pull_requests.len(), 1);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.markdown_files.len(), 1);
        assert_eq!(result.total(), 3);

        let kinds: Vec<&str> = result.all.iter().map(|d| d.metadata.kind()).collect();
        assert_eq!(kinds, vec!["pull_request", "issue", "markdown_file"]);
    }

    #[tokio::test]
    async fn test_one_failing_pipeline_fails_the_whole_call() {
        let api = SmallRepoApi {
            markdown_fails: true,
        };
        let governor = CallGovernor::new(2, 0);
        let result = run_pipelines(&api, &governor, &repo(), &FetchOptions::default()).await;

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("contents listing unavailable"));
    }
}
