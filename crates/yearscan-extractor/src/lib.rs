//! Yearscan Extractor
//!
//! Determines the most recent plausible year for each record of a batch.
//!
//! # Architecture
//!
//! ```text
//! Records → RULE_PASS ─ resolved ──────────────────────────┐
//!               └─ unresolved → AI_PASS → VERIFY (opt.) → MERGE → Results
//! ```
//!
//! Deterministic rules handle dates and quarter notations. Whatever they
//! cannot resolve goes to a language model through the bounded
//! [`InferenceClient`](yearscan_llm::InferenceClient); its free-form answer is
//! sanitized and reduced to a four-digit year or the not-found value.
//!
//! # Example Usage
//!
//! ```
//! use yearscan_domain::{Origin, Record};
//! use yearscan_extractor::{ExtractorConfig, RecordClassificationPipeline};
//! use yearscan_llm::{InferenceClient, MockProvider};
//!
//! # tokio_test::block_on(async {
//! let client = InferenceClient::new(MockProvider::new("Year: 2019"));
//! let pipeline = RecordClassificationPipeline::new(ExtractorConfig::default(), client).unwrap();
//!
//! let results = pipeline
//!     .process(vec![
//!         Record::new("1", "invoice_01.12.2025.pdf"),
//!         Record::new("2", "Plan vom Frühjahr 2019"),
//!     ])
//!     .await
//!     .unwrap();
//!
//! assert_eq!(results[0].year, "2025");
//! assert_eq!(results[0].origin, Origin::Rule);
//! assert_eq!(results[1].year, "2019");
//! assert_eq!(results[1].origin, Origin::Ai);
//! # });
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod pipeline;
mod prompt;
mod sanitize;
mod types;
mod verify;


pub use config::{ExtractorConfig, STANDARD_BLACKLIST};
pub use error::ExtractorError;
pub use pipeline::RecordClassificationPipeline;
pub use prompt::PromptBuilder;
pub use sanitize::{extract_year_token, sanitize, DELIMITER};
pub use types::{BatchMetadata, BatchReport};
pub use verify::{AiResultVerifier, Rejection};
