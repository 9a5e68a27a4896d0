//! Typed failures raised by the ingestion engine.
//!
//! Pipeline code reports errors as `anyhow` chains like the rest of the
//! application; the variants here cover the structurally typed cases that
//! callers and tests match on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// The repository reference could not be parsed. Raised before any
    /// network call is issued.
    #[error("invalid repository reference '{input}': expected .../<owner>/<repo>")]
    InvalidRepositoryReference { input: String },

    /// A required identifying field was structurally absent from an
    /// otherwise well-formed upstream item.
    #[error("malformed {kind} item from upstream: missing required field '{field}'")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    /// The upstream API answered with a non-success status. Treated like any
    /// other remote failure by the governor's retry policy.
    #[error("GitHub API error {status} for {url}: {body}")]
    UpstreamStatus {
        status: u16,
        url: String,
        body: String,
    },
}
