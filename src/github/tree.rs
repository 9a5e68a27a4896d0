//! Markdown harvesting from the repository contents tree.
//!
//! The walk is depth-first in upstream listing order: a directory's subtree
//! completes before its next sibling is touched, which keeps outstanding
//! network load within the governor's single concurrency budget instead of
//! spawning parallel subtrees. An explicit work list replaces call
//! recursion, so arbitrarily deep trees never grow the call stack.

use crate::github::client::RepositoryApi;
use crate::github::types::ContentEntry;
use crate::governor::CallGovernor;
use crate::models::{Document, FetchOptions, RepositoryRef};
use crate::normalize;
use anyhow::Result;
use tracing::{debug, info, warn};

enum WorkItem {
    /// List the directory at this path.
    List(String),
    /// Fetch and normalize a markdown file entry.
    Fetch(ContentEntry),
}

/// Collect every markdown file reachable from the repository root.
///
/// Stops the whole traversal the moment the configured result cap is
/// reached; entries and subtrees not yet visited at that point are never
/// requested.
pub async fn collect_markdown(
    api: &dyn RepositoryApi,
    governor: &CallGovernor,
    repo: &RepositoryRef,
    options: &FetchOptions,
) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    // LIFO work list. Children are pushed in reverse so they pop in upstream
    // listing order, and a directory's subtree drains before its next sibling.
    let mut work = vec![WorkItem::List(String::new())];

    while let Some(item) = work.pop() {
        if reached_cap(documents.len(), options.max_results) {
            debug!("Markdown cap reached, abandoning {} pending entries", work.len());
            break;
        }

        match item {
            WorkItem::List(path) => {
                let entries = governor
                    .execute(|| api.list_directory(repo, &path, &options.branch))
                    .await?;
                debug!("Listed {} entries under '{}'", entries.len(), path);

                for entry in entries.into_iter().rev() {
                    if entry.is_dir() {
                        work.push(WorkItem::List(entry.path.clone()));
                    } else if entry.is_markdown_file() {
                        work.push(WorkItem::Fetch(entry));
                    }
                }
            }
            WorkItem::Fetch(entry) => {
                let download_url = match entry.download_url {
                    Some(ref url) => url.clone(),
                    None => {
                        warn!("No download URL for {}, skipping", entry.path);
                        continue;
                    }
                };
                let raw_text = governor.execute(|| api.fetch_raw(&download_url)).await?;
                documents.push(normalize::markdown_file(
                    &entry,
                    &raw_text,
                    repo,
                    &options.branch,
                ));
            }
        }
    }

    info!("Collected {} markdown files", documents.len());
    Ok(documents)
}

fn reached_cap(count: usize, max_results: Option<usize>) -> bool {
    max_results.map_or(false, |cap| count >= cap)
}
