//! Yearscan Domain Layer
//!
//! Core types and trait interfaces shared by every Yearscan crate. Like any
//! domain layer it has ZERO external dependencies: the rule engine, the
//! inference client and the pipeline all depend on it, never the other way
//! around.
//!
//! ## Key Concepts
//!
//! - **Record**: one input row, an id plus the flattened free text
//! - **YearCandidate**: a year recognized by one of the rule patterns
//! - **ExtractionResult**: the single output row per record, tagged with its
//!   [`Origin`] (`RULE` or `AI`)
//! - **Sentinel**: `"0"` or the empty string, meaning "no year determined"

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod record;
pub mod result;
pub mod traits;
pub mod year;

// Re-exports for convenience
pub use record::Record;
pub use result::{ExtractionResult, Origin};
pub use year::{is_plausible_year, PatternSource, YearCandidate, MAX_YEAR, MIN_YEAR, YEAR_SENTINEL};
