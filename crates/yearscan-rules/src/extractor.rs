//! The rule-based extractor: dates and quarters combined

use crate::date::date_years;
use crate::quarter::quarter_years;
use tracing::trace;
use yearscan_domain::traits::YearExtractor;
use yearscan_domain::YearCandidate;

/// Extracts the most recent year from free text using the date and quarter tables
///
/// Stateless and pure, so one instance can be shared across threads and
/// tasks without synchronization.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedYearExtractor;

impl RuleBasedYearExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }

    /// All candidates from both tables, dates first
    pub fn extract_candidates(&self, text: &str) -> Vec<YearCandidate> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut candidates = date_years(text);
        candidates.extend(quarter_years(text));
        trace!("{} year candidates in {} chars", candidates.len(), text.len());
        candidates
    }

    /// The most recent candidate year, if any
    pub fn latest_year(&self, text: &str) -> Option<u16> {
        self.extract_candidates(text).into_iter().map(|c| c.year).max()
    }

    /// The most recent year as a string, or `""` when nothing was recognized
    pub fn extract(&self, text: &str) -> String {
        self.latest_year(text)
            .map(|year| year.to_string())
            .unwrap_or_default()
    }
}

impl YearExtractor for RuleBasedYearExtractor {
    fn extract(&self, text: &str) -> String {
        RuleBasedYearExtractor::extract(self, text)
    }
}
