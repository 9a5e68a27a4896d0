//! GitHub REST ingestion: client, list pagination, and tree traversal.

pub mod client;
pub mod paginator;
pub mod tree;
pub mod types;

pub use client::{GitHubClient, RepositoryApi};
