//! Extraction results and their provenance tag

use std::fmt;

/// Which stage resolved a record's year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Resolved (or passed through) by the rule engine
    Rule,

    /// Resolved by the language-model fallback
    Ai,
}

impl Origin {
    /// Get the origin tag as written to output files
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Rule => "RULE",
            Origin::Ai => "AI",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single output row for one input record
///
/// `year` stays a string so the sentinel values (`"0"`, `""`) survive
/// unchanged on their way to the CSV sink.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtractionResult {
    /// Id of the originating record
    pub id: String,

    /// Four-digit year, a sentinel, or empty
    pub year: String,

    /// Stage that produced the year
    pub origin: Origin,
}

impl ExtractionResult {
    /// Result produced by the rule engine
    pub fn rule(id: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            year: year.into(),
            origin: Origin::Rule,
        }
    }

    /// Result produced by the model fallback
    pub fn ai(id: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            year: year.into(),
            origin: Origin::Ai,
        }
    }

    /// True when `year` holds an actual four-digit year
    pub fn has_year(&self) -> bool {
        self.year.len() == 4 && self.year.bytes().all(|b| b.is_ascii_digit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_tags() {
        assert_eq!(Origin::Rule.as_str(), "RULE");
        assert_eq!(Origin::Ai.to_string(), "AI");
    }

    #[test]
    fn test_has_year() {
        assert!(ExtractionResult::rule("1", "2023").has_year());
        assert!(!ExtractionResult::rule("1", "").has_year());
        assert!(!ExtractionResult::ai("1", "0").has_year());
    }

    #[test]
    fn test_constructors_tag_origin() {
        assert_eq!(ExtractionResult::rule("1", "2023").origin, Origin::Rule);
        assert_eq!(ExtractionResult::ai("1", "2023").origin, Origin::Ai);
    }
}
