//! Calendar-date recognition
//!
//! Every supported format is one row of [`DATE_RULES`]: a pattern, the
//! capture-group layout of its year/month/day fields, and the source tag.
//! All rows go through the same scan → calendar check → range check path.

use crate::pattern::{bounded_captures, group_u32, Guard};
use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use yearscan_domain::{PatternSource, YearCandidate};

/// Capture-group indices of the date fields within a pattern
#[derive(Debug, Clone, Copy)]
struct FieldLayout {
    year: usize,
    month: usize,
    day: usize,
}

const YMD: FieldLayout = FieldLayout { year: 1, month: 2, day: 3 };
const DMY: FieldLayout = FieldLayout { year: 3, month: 2, day: 1 };
const MDY: FieldLayout = FieldLayout { year: 3, month: 1, day: 2 };

struct DateRule {
    source: PatternSource,
    regex: Regex,
    layout: FieldLayout,
}

impl DateRule {
    fn new(source: PatternSource, pattern: &str, layout: FieldLayout) -> Self {
        let regex = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("{} date pattern is invalid: {}", source, e));
        Self { source, regex, layout }
    }

    fn candidate(&self, caps: &Captures<'_>) -> Option<YearCandidate> {
        let year = group_u32(caps, self.layout.year)?;
        let month = group_u32(caps, self.layout.month)?;
        let day = group_u32(caps, self.layout.day)?;

        if !is_calendar_date(year, month, day) {
            return None;
        }
        YearCandidate::new(year, self.source)
    }
}

const MONTH: &str = "(0[1-9]|1[0-2])";
const DAY: &str = "(0[1-9]|[12][0-9]|3[01])";
const ANY_YEAR: &str = "([0-9]{4})";
const CENTURY_YEAR: &str = "((?:19|20)[0-9]{2})";

static DATE_RULES: LazyLock<Vec<DateRule>> = LazyLock::new(|| {
    vec![
        DateRule::new(
            PatternSource::Iso,
            &format!("{ANY_YEAR}[-/]{MONTH}[-/]{DAY}"),
            YMD,
        ),
        DateRule::new(
            PatternSource::European,
            &format!(r"{DAY}\.{MONTH}\.{CENTURY_YEAR}"),
            DMY,
        ),
        DateRule::new(
            PatternSource::CompactYmd,
            &format!("{CENTURY_YEAR}{MONTH}{DAY}"),
            YMD,
        ),
        DateRule::new(
            PatternSource::CompactDmy,
            &format!("{DAY}{MONTH}{CENTURY_YEAR}"),
            DMY,
        ),
        DateRule::new(
            PatternSource::CompactMdy,
            &format!("{MONTH}{DAY}{CENTURY_YEAR}"),
            MDY,
        ),
        DateRule::new(
            PatternSource::Timestamp,
            &format!(r"{ANY_YEAR}[-/]{MONTH}[-/]{DAY}[\s_T]([0-9]{{2}}):?([0-9]{{2}}):?([0-9]{{2}})"),
            YMD,
        ),
    ]
});

/// Check that year/month/day name a real day of the proleptic Gregorian calendar
fn is_calendar_date(year: u32, month: u32, day: u32) -> bool {
    i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, month, day))
        .is_some()
}

/// Collect every valid year implied by a recognized date in `text`.
///
/// Each format is scanned independently, so one digit run may contribute
/// several candidates (e.g. `01022003` as both DDMMYYYY and MMDDYYYY).
/// Invalid calendar dates and years outside 1900–2100 are dropped silently.
pub fn date_years(text: &str) -> Vec<YearCandidate> {
    DATE_RULES
        .iter()
        .flat_map(|rule| {
            bounded_captures(&rule.regex, text, Guard::Both)
                .into_iter()
                .filter_map(move |caps| rule.candidate(&caps))
        })
        .collect()
}

/// The most recent year among [`date_years`], if any
pub fn latest_date_year(text: &str) -> Option<u16> {
    date_years(text).into_iter().map(|c| c.year).max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(text: &str) -> Vec<PatternSource> {
        date_years(text).into_iter().map(|c| c.source).collect()
    }

    #[test]
    fn test_all_rules_compile() {
        assert_eq!(DATE_RULES.len(), 6);
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(latest_date_year("data_2022-01-01_and_2023-12-31.csv"), Some(2023));
        assert_eq!(latest_date_year("scan 2019/07/04"), Some(2019));
    }

    #[test]
    fn test_european_date() {
        assert_eq!(latest_date_year("invoice_01.12.2025.pdf"), Some(2025));
        assert_eq!(sources("contract_31.01.2024_signed.docx"), vec![PatternSource::European]);
    }

    #[test]
    fn test_compact_dates() {
        assert_eq!(sources("report_20231215_final.pdf"), vec![PatternSource::CompactYmd]);
        assert_eq!(sources("backup_15122023.zip"), vec![PatternSource::CompactDmy]);
        assert_eq!(sources("file_12152023_important.txt"), vec![PatternSource::CompactMdy]);
    }

    #[test]
    fn test_ambiguous_compact_date_yields_every_valid_reading() {
        let found = sources("scan_01022003");
        assert!(found.contains(&PatternSource::CompactDmy));
        assert!(found.contains(&PatternSource::CompactMdy));
        assert_eq!(latest_date_year("scan_01022003"), Some(2003));
    }

    #[test]
    fn test_timestamps() {
        let found = sources("meeting_2023-11-26 14:30:00.log");
        assert!(found.contains(&PatternSource::Timestamp));
        assert!(found.contains(&PatternSource::Iso));
        assert_eq!(latest_date_year("dump_2024/02/29_235959"), Some(2024));
        assert_eq!(latest_date_year("export 2021-03-04T08:15:59"), Some(2021));
    }

    #[test]
    fn test_invalid_calendar_dates_are_discarded() {
        assert_eq!(latest_date_year("x_2023-02-30"), None);
        assert_eq!(latest_date_year("x_2023-02-29"), None);
        assert_eq!(latest_date_year("x_2024-02-29"), Some(2024));
        assert_eq!(latest_date_year("31.04.2020"), None);
    }

    #[test]
    fn test_out_of_range_years_are_discarded() {
        assert_eq!(latest_date_year("1850-05-05"), None);
        assert_eq!(latest_date_year("2150-05-05"), None);
        assert_eq!(latest_date_year("1900-01-01"), Some(1900));
    }

    #[test]
    fn test_digit_boundaries() {
        assert_eq!(latest_date_year("ref 120231215"), None);
        assert_eq!(latest_date_year("ref 202312150"), None);
        assert_eq!(latest_date_year("ref 12023-12-15"), None);
    }

    #[test]
    fn test_standalone_years_are_ignored() {
        assert_eq!(latest_date_year("2020 2021 2022"), None);
        assert_eq!(latest_date_year("just 2023 here"), None);
    }
}
