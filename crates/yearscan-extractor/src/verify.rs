//! Plausibility checks for model-resolved years

use crate::config::ExtractorConfig;
use std::collections::HashSet;
use tracing::debug;
use yearscan_domain::{ExtractionResult, Origin};

/// Why an AI year was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The year appears as a week marker (`WE 2023`, `WE 0023`)
    WeekMarker,
    /// The year is on the blacklist
    Blacklisted,
    /// The year's last two digits never occur in the source text
    NotInText,
}

/// Resets implausible AI years to the not-found value
#[derive(Debug, Clone)]
pub struct AiResultVerifier {
    blacklist: HashSet<String>,
    not_found: String,
}

impl AiResultVerifier {
    /// Create a verifier from the pipeline configuration
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            blacklist: config.blacklist_years.iter().cloned().collect(),
            not_found: config.not_found_return_value.clone(),
        }
    }

    /// Check one year against the text it was extracted from
    pub fn check(&self, year: &str, text: &str) -> Result<(), Rejection> {
        let last_two = year.get(year.len().saturating_sub(2)..).unwrap_or(year);

        if text.contains(&format!("WE {}", year)) || text.contains(&format!("WE 00{}", last_two)) {
            return Err(Rejection::WeekMarker);
        }
        if self.blacklist.contains(year) {
            return Err(Rejection::Blacklisted);
        }
        if !text.contains(last_two) {
            return Err(Rejection::NotInText);
        }
        Ok(())
    }

    /// Verify one result in place; returns true if it was reset
    ///
    /// Only AI results that carry a real year are checked.
    pub fn apply(&self, result: &mut ExtractionResult, text: &str) -> bool {
        if result.origin != Origin::Ai || !result.has_year() {
            return false;
        }
        match self.check(&result.year, text) {
            Ok(()) => false,
            Err(reason) => {
                debug!(id = %result.id, year = %result.year, ?reason, "AI year rejected");
                result.year = self.not_found.clone();
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> AiResultVerifier {
        AiResultVerifier::new(&ExtractorConfig::verified())
    }

    #[test]
    fn test_accepts_year_present_in_text() {
        assert_eq!(verifier().check("2019", "Grundriss Stand 2019"), Ok(()));
        assert_eq!(verifier().check("2019", "Plan 03/19"), Ok(()));
    }

    #[test]
    fn test_rejects_week_markers() {
        assert_eq!(verifier().check("2023", "Lieferung WE 2023"), Err(Rejection::WeekMarker));
        assert_eq!(verifier().check("2023", "Lieferung WE 0023"), Err(Rejection::WeekMarker));
    }

    #[test]
    fn test_rejects_blacklisted_years() {
        assert_eq!(verifier().check("2025", "Bau 2025"), Err(Rejection::Blacklisted));
        assert_eq!(verifier().check("1900", "seit 1900"), Err(Rejection::Blacklisted));
    }

    #[test]
    fn test_rejects_year_missing_from_text() {
        assert_eq!(verifier().check("2018", "Bauantrag ohne Datum"), Err(Rejection::NotInText));
    }

    #[test]
    fn test_apply_resets_only_ai_years() {
        let v = verifier();

        let mut ai = ExtractionResult::ai("1", "2018");
        assert!(v.apply(&mut ai, "kein Datum"));
        assert_eq!(ai.year, "0");

        let mut rule = ExtractionResult::rule("2", "2018");
        assert!(!v.apply(&mut rule, "kein Datum"));
        assert_eq!(rule.year, "2018");

        let mut sentinel = ExtractionResult::ai("3", "0");
        assert!(!v.apply(&mut sentinel, "kein Datum"));
    }

    #[test]
    fn test_custom_not_found_value() {
        let mut config = ExtractorConfig::verified();
        config.not_found_return_value = "unknown".to_string();
        let v = AiResultVerifier::new(&config);

        let mut result = ExtractionResult::ai("1", "2040");
        assert!(v.apply(&mut result, "2040"));
        assert_eq!(result.year, "unknown");
    }
}
