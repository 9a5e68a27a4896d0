//! Page-by-page fetching of pull requests and issues.
//!
//! Both listers walk pages starting at 1 and stop on the first of: an empty
//! page, a page shorter than the requested size, or the configured result
//! cap. Items are normalized in arrival order; no page is fetched twice.

use crate::github::client::RepositoryApi;
use crate::governor::CallGovernor;
use crate::models::{Document, FetchOptions, RepositoryRef};
use crate::normalize;
use anyhow::Result;
use tracing::{debug, info};

/// Fetch and normalize pull requests until a stop condition holds.
pub async fn fetch_pull_requests(
    api: &dyn RepositoryApi,
    governor: &CallGovernor,
    repo: &RepositoryRef,
    options: &FetchOptions,
) -> Result<Vec<Document>> {
    let state = options.state.to_string();
    let per_page = options.per_page_clamped();
    let mut documents = Vec::new();
    let mut page: u32 = 1;

    loop {
        let items = governor
            .execute(|| api.list_pull_requests(repo, &state, per_page, page))
            .await?;
        debug!("Page {} returned {} pull requests", page, items.len());

        if items.is_empty() {
            break;
        }
        let page_len = items.len();

        for item in &items {
            if reached_cap(documents.len(), options.max_results) {
                return Ok(documents);
            }
            documents.push(normalize::pull_request(item, repo)?);
        }

        // A short page signals the final page.
        if page_len < per_page as usize {
            break;
        }
        page += 1;
    }

    info!("Collected {} pull requests", documents.len());
    Ok(documents)
}

/// Fetch and normalize issues until a stop condition holds.
///
/// The issues endpoint also returns pull requests; those are skipped before
/// normalization and do not count toward the result cap.
pub async fn fetch_issues(
    api: &dyn RepositoryApi,
    governor: &CallGovernor,
    repo: &RepositoryRef,
    options: &FetchOptions,
) -> Result<Vec<Document>> {
    let state = options.state.to_string();
    let per_page = options.per_page_clamped();
    let mut documents = Vec::new();
    let mut page: u32 = 1;

    loop {
        let items = governor
            .execute(|| api.list_issues(repo, &state, per_page, page))
            .await?;
        debug!("Page {} returned {} issues", page, items.len());

        if items.is_empty() {
            break;
        }
        let page_len = items.len();

        for item in &items {
            if reached_cap(documents.len(), options.max_results) {
                return Ok(documents);
            }
            if item.is_pull_request() {
                debug!("Skipping pull request {:?} in issues listing", item.number);
                continue;
            }
            documents.push(normalize::issue(item, repo)?);
        }

        if page_len < per_page as usize {
            break;
        }
        page += 1;
    }

    info!("Collected {} issues", documents.len());
    Ok(documents)
}

fn reached_cap(count: usize, max_results: Option<usize>) -> bool {
    max_results.map_or(false, |cap| count >= cap)
}
