//! Error types for the pipeline
//!
//! Only batch-level problems are errors. Per-record failures (bad dates,
//! failed or nonsensical model answers) degrade to sentinel values instead.

use thiserror::Error;

/// Errors that can occur while processing a batch
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The same id appears twice with different text
    #[error("Duplicate record id '{0}' with conflicting text")]
    DuplicateId(String),

    /// A record that cannot be processed at all
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}
