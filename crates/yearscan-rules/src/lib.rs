//! Yearscan Rules
//!
//! Deterministic, rule-based year extraction from free text.
//!
//! # Overview
//!
//! The rule engine is the fast first tier of Yearscan. It recognizes dates in
//! a handful of well-defined formats, validates every match as a real
//! calendar date, and returns the most recent year. Anything it cannot
//! resolve is left for the language-model fallback.
//!
//! # Architecture
//!
//! ```text
//! text → date table (6 formats)    ┐
//!                                  ├→ candidates → max year → "YYYY" | ""
//! text → quarter table (3 formats) ┘
//! ```
//!
//! Standalone four-digit numbers ("2020 2021") are never counted: without a
//! surrounding date structure they are too unreliable.
//!
//! # Example Usage
//!
//! ```
//! use yearscan_rules::RuleBasedYearExtractor;
//!
//! let extractor = RuleBasedYearExtractor::new();
//! assert_eq!(extractor.extract("report_20231215_final.pdf"), "2023");
//! assert_eq!(extractor.extract("Q1/25_report.pdf"), "2025");
//! assert_eq!(extractor.extract("2020 2021 2022"), "");
//! ```

#![warn(missing_docs)]

mod pattern;
mod date;
mod quarter;
mod extractor;

pub use date::{date_years, latest_date_year};
pub use quarter::quarter_years;
pub use extractor::RuleBasedYearExtractor;
