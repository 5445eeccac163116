//! Year bounds and the candidates produced by the rule matchers

use std::fmt;

/// Earliest year accepted anywhere in the system
pub const MIN_YEAR: u16 = 1900;

/// Latest year accepted anywhere in the system
pub const MAX_YEAR: u16 = 2100;

/// Value returned when a model response carries no usable year
pub const YEAR_SENTINEL: &str = "0";

/// Check that a numeric year lies within [`MIN_YEAR`], [`MAX_YEAR`]
///
/// # Examples
///
/// ```
/// use yearscan_domain::is_plausible_year;
///
/// assert!(is_plausible_year(1900));
/// assert!(is_plausible_year(2100));
/// assert!(!is_plausible_year(1850));
/// assert!(!is_plausible_year(2101));
/// ```
pub fn is_plausible_year(year: u32) -> bool {
    (MIN_YEAR as u32..=MAX_YEAR as u32).contains(&year)
}

/// The textual format a year was recognized in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternSource {
    /// `YYYY-MM-DD` or `YYYY/MM/DD`
    Iso,

    /// `DD.MM.YYYY`
    European,

    /// `YYYYMMDD`
    CompactYmd,

    /// `DDMMYYYY`
    CompactDmy,

    /// `MMDDYYYY`
    CompactMdy,

    /// `YYYY-MM-DD HH:MM:SS` and its `_`/`T` variants
    Timestamp,

    /// `Q1/25`, `Q2-25`, `Q3 25`
    QuarterShort,

    /// `Q1/2025`, `Q2-2025`, `Q3 2025`
    QuarterLong,

    /// `2025Q1`
    QuarterReverse,
}

impl PatternSource {
    /// Get the pattern name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternSource::Iso => "iso",
            PatternSource::European => "european",
            PatternSource::CompactYmd => "compact_ymd",
            PatternSource::CompactDmy => "compact_dmy",
            PatternSource::CompactMdy => "compact_mdy",
            PatternSource::Timestamp => "timestamp",
            PatternSource::QuarterShort => "quarter_short",
            PatternSource::QuarterLong => "quarter_long",
            PatternSource::QuarterReverse => "quarter_reverse",
        }
    }

    /// Whether this pattern needs calendar validation (quarters do not)
    pub fn is_calendar_date(&self) -> bool {
        !matches!(
            self,
            PatternSource::QuarterShort | PatternSource::QuarterLong | PatternSource::QuarterReverse
        )
    }
}

impl fmt::Display for PatternSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A year recognized by one pattern. Transient, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearCandidate {
    /// Four-digit year, already range checked
    pub year: u16,

    /// Pattern that produced it
    pub source: PatternSource,
}

impl YearCandidate {
    /// Create a candidate, rejecting years outside the plausible range
    ///
    /// # Examples
    ///
    /// ```
    /// use yearscan_domain::{PatternSource, YearCandidate};
    ///
    /// assert!(YearCandidate::new(2023, PatternSource::Iso).is_some());
    /// assert!(YearCandidate::new(1899, PatternSource::Iso).is_none());
    /// ```
    pub fn new(year: u32, source: PatternSource) -> Option<Self> {
        if !is_plausible_year(year) {
            return None;
        }
        Some(Self {
            year: year as u16,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(is_plausible_year(MIN_YEAR as u32));
        assert!(is_plausible_year(MAX_YEAR as u32));
        assert!(!is_plausible_year(MIN_YEAR as u32 - 1));
        assert!(!is_plausible_year(MAX_YEAR as u32 + 1));
    }

    #[test]
    fn test_quarters_skip_calendar_validation() {
        assert!(PatternSource::Iso.is_calendar_date());
        assert!(PatternSource::Timestamp.is_calendar_date());
        assert!(!PatternSource::QuarterShort.is_calendar_date());
        assert!(!PatternSource::QuarterReverse.is_calendar_date());
    }

    #[test]
    fn test_pattern_display() {
        assert_eq!(PatternSource::CompactDmy.to_string(), "compact_dmy");
    }

    proptest! {
        #[test]
        fn candidate_years_always_in_range(year in 0u32..5000) {
            if let Some(candidate) = YearCandidate::new(year, PatternSource::Iso) {
                prop_assert!(candidate.year >= MIN_YEAR && candidate.year <= MAX_YEAR);
            } else {
                prop_assert!(!is_plausible_year(year));
            }
        }
    }
}
