//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::future::Future;

/// Trait for language-model text completion
///
/// Implemented by the infrastructure layer (yearscan-llm). The returned
/// future must be `Send` so calls can be multiplexed by the pipeline.
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: std::fmt::Display + Send;

    /// Generate a text completion for a single user prompt
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// Trait for deterministic, synchronous year extraction
///
/// Implemented by the rule layer (yearscan-rules).
pub trait YearExtractor: Send + Sync {
    /// Return the most recent year found in `text`, or an empty string
    fn extract(&self, text: &str) -> String;
}
