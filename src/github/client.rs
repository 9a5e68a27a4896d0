//! GitHub REST client and the API seam the fetch pipelines depend on.
//!
//! The pipelines are written against [`RepositoryApi`] so they can be
//! exercised with in-memory stubs; [`GitHubClient`] is the production
//! implementation backed by `reqwest`.

use crate::error::IngestError;
use crate::github::types::{ContentEntry, RawIssue, RawPullRequest};
use crate::models::{FetchOptions, RepositoryRef};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Versioned JSON media type GitHub expects.
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Transport-level request timeout. The engine layers no timeout of its own
/// on top of this.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote operations consumed by the fetch pipelines.
#[async_trait]
pub trait RepositoryApi: Send + Sync {
    /// One page of the pull-request listing.
    async fn list_pull_requests(
        &self,
        repo: &RepositoryRef,
        state: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<RawPullRequest>>;

    /// One page of the issues listing (which upstream documents to also
    /// include pull requests).
    async fn list_issues(
        &self,
        repo: &RepositoryRef,
        state: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<RawIssue>>;

    /// Entries of the directory at `path` on `branch`.
    async fn list_directory(
        &self,
        repo: &RepositoryRef,
        path: &str,
        branch: &str,
    ) -> Result<Vec<ContentEntry>>;

    /// Raw text content behind a listed file's download URL.
    async fn fetch_raw(&self, url: &str) -> Result<String>;
}

/// Thin `reqwest` wrapper around the GitHub REST endpoints.
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Build a client for one ingestion call.
    pub fn new(options: &FetchOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        let http = reqwest::Client::builder()
            .user_agent(concat!("repopulse/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            api_base: options.api_base_url.trim_end_matches('/').to_string(),
            token: options.access_token.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);

        let mut request = self.http.get(url);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(IngestError::UpstreamStatus {
                status,
                url: url.to_string(),
                body,
            }
            .into());
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))
    }

    fn list_url(
        &self,
        repo: &RepositoryRef,
        endpoint: &str,
        state: &str,
        per_page: u32,
        page: u32,
    ) -> String {
        format!(
            "{}/repos/{}/{}/{}?state={}&per_page={}&page={}",
            self.api_base, repo.owner, repo.name, endpoint, state, per_page, page
        )
    }

    /// Contents URL with the file path percent-encoded segment by segment.
    fn contents_url(&self, repo: &RepositoryRef, path: &str, branch: &str) -> Result<String> {
        let mut url = Url::parse(&self.api_base)
            .with_context(|| format!("Invalid API base URL: {}", self.api_base))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("API base URL has no path: {}", self.api_base))?;
            segments.pop_if_empty();
            segments.extend(["repos", repo.owner.as_str(), repo.name.as_str(), "contents"]);
            for component in path.split('/').filter(|c| !c.is_empty()) {
                segments.push(component);
            }
        }
        url.query_pairs_mut().append_pair("ref", branch);

        Ok(url.to_string())
    }
}

#[async_trait]
impl RepositoryApi for GitHubClient {
    async fn list_pull_requests(
        &self,
        repo: &RepositoryRef,
        state: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<RawPullRequest>> {
        let url = self.list_url(repo, "pulls", state, per_page, page);
        self.get_json(&url).await
    }

    async fn list_issues(
        &self,
        repo: &RepositoryRef,
        state: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<RawIssue>> {
        let url = self.list_url(repo, "issues", state, per_page, page);
        self.get_json(&url).await
    }

    async fn list_directory(
        &self,
        repo: &RepositoryRef,
        path: &str,
        branch: &str,
    ) -> Result<Vec<ContentEntry>> {
        let url = self.contents_url(repo, path, branch)?;
        self.get_json(&url).await
    }

    async fn fetch_raw(&self, url: &str) -> Result<String> {
        debug!("GET {} (raw)", url);

        let mut request = self.http.get(url);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(IngestError::UpstreamStatus {
                status,
                url: url.to_string(),
                body,
            }
            .into());
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read raw content from {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GitHubClient {
        GitHubClient::new(&FetchOptions::default()).unwrap()
    }

    fn repo() -> RepositoryRef {
        RepositoryRef::parse("owner/repo").unwrap()
    }

    #[test]
    fn test_list_url_format() {
        let url = client().list_url(&repo(), "pulls", "open", 50, 3);
        assert_eq!(
            url,
            "https://api.github.com/repos/owner/repo/pulls?state=open&per_page=50&page=3"
        );
    }

    #[test]
    fn test_trailing_slash_in_base_url_is_ignored() {
        let mut options = FetchOptions::default();
        options.api_base_url = "https://ghe.example.com/api/v3/".to_string();
        let client = GitHubClient::new(&options).unwrap();

        let url = client.list_url(&repo(), "issues", "all", 100, 1);
        assert_eq!(
            url,
            "https://ghe.example.com/api/v3/repos/owner/repo/issues?state=all&per_page=100&page=1"
        );
    }

    #[test]
    fn test_contents_url_root() {
        let url = client().contents_url(&repo(), "", "main").unwrap();
        assert_eq!(
            url,
            "https://api.github.com/repos/owner/repo/contents?ref=main"
        );
    }

    #[test]
    fn test_contents_url_encodes_path_segments() {
        let url = client()
            .contents_url(&repo(), "docs/user guide/intro.md", "release/1.0")
            .unwrap();
        assert_eq!(
            url,
            "https://api.github.com/repos/owner/repo/contents/docs/user%20guide/intro.md?ref=release%2F1.0"
        );
    }
}
