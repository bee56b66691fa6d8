//! Error types for the report pipeline.
//!
//! Errors are categorized by pipeline stage so failures can be attributed
//! to a specific target and isolated there. Nothing in this module ever
//! aborts a whole run: expansion and query errors become tombstone
//! entries, and export errors propagate only to the caller of that one
//! export operation.

use crate::remote::RemoteError;
use thiserror::Error;

/// A descriptor could not be expanded into queryable layer targets.
#[derive(Debug, Error)]
pub enum ExpansionError {
    /// Service root metadata could not be fetched or was malformed
    #[error("metadata lookup failed for {url}: {source}")]
    Metadata {
        url: String,
        #[source]
        source: RemoteError,
    },
}

/// A target's count or sample query failed.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The feature-count query failed
    #[error("count query failed for {title} ({url}): {source}")]
    Count {
        title: String,
        url: String,
        #[source]
        source: RemoteError,
    },

    /// The bounded sample query failed
    #[error("sample query failed for {title} ({url}): {source}")]
    Sample {
        title: String,
        url: String,
        #[source]
        source: RemoteError,
    },
}

/// A full export failed or could not start.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A page fetch failed mid-export; the accumulated prefix is dropped
    #[error("page fetch failed at offset {offset} for {url}: {source}")]
    PageFetch {
        url: String,
        offset: u64,
        #[source]
        source: RemoteError,
    },

    /// No report run is active on the session
    #[error("no report run is active")]
    NoActiveRun,

    /// The run has no entry at the given index
    #[error("no report entry at index {0}")]
    UnknownEntry(usize),

    /// The entry failed during querying and carries no exportable data
    #[error("entry {title} failed during querying and cannot be exported")]
    ErroredEntry { title: String },
}
