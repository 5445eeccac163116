//! Fiscal-quarter recognition (`Q1/25`, `Q2-2025`, `Q3 2024`, `2024Q4`)

use crate::pattern::{bounded_captures, group_u32, Guard};
use regex::Regex;
use std::sync::LazyLock;
use yearscan_domain::{PatternSource, YearCandidate};

/// How the captured year digits map to a four-digit year
#[derive(Debug, Clone, Copy)]
enum YearForm {
    /// Two digits, always read as `20YY`
    TwoDigit,
    /// Four digits, taken as-is
    FourDigit,
}

struct QuarterRule {
    source: PatternSource,
    regex: Regex,
    guard: Guard,
    year_group: usize,
    form: YearForm,
}

impl QuarterRule {
    fn new(source: PatternSource, pattern: &str, guard: Guard, year_group: usize, form: YearForm) -> Self {
        let regex = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("{} quarter pattern is invalid: {}", source, e));
        Self {
            source,
            regex,
            guard,
            year_group,
            form,
        }
    }
}

static QUARTER_RULES: LazyLock<Vec<QuarterRule>> = LazyLock::new(|| {
    vec![
        QuarterRule::new(
            PatternSource::QuarterShort,
            r"[Qq]([1-4])[-/\s]([0-9]{2})",
            Guard::After,
            2,
            YearForm::TwoDigit,
        ),
        QuarterRule::new(
            PatternSource::QuarterLong,
            r"[Qq]([1-4])[-/\s]((?:19|20)[0-9]{2})",
            Guard::After,
            2,
            YearForm::FourDigit,
        ),
        QuarterRule::new(
            PatternSource::QuarterReverse,
            r"((?:19|20)[0-9]{2})[Qq]([1-4])",
            Guard::Both,
            1,
            YearForm::FourDigit,
        ),
    ]
});

/// Collect the years named by quarter notations in `text`.
///
/// Two-digit years are always placed in the 2000s, so `Q1/98` yields 2098.
/// Only the 1900–2100 range is checked; quarters need no calendar validation.
pub fn quarter_years(text: &str) -> Vec<YearCandidate> {
    QUARTER_RULES
        .iter()
        .flat_map(|rule| {
            bounded_captures(&rule.regex, text, rule.guard)
                .into_iter()
                .filter_map(move |caps| {
                    let digits = group_u32(&caps, rule.year_group)?;
                    let year = match rule.form {
                        YearForm::TwoDigit => 2000 + digits,
                        YearForm::FourDigit => digits,
                    };
                    YearCandidate::new(year, rule.source)
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years(text: &str) -> Vec<u16> {
        let mut found: Vec<u16> = quarter_years(text).into_iter().map(|c| c.year).collect();
        found.sort_unstable();
        found
    }

    #[test]
    fn test_short_quarter_maps_to_2000s() {
        assert_eq!(years("Q1/25_report.pdf"), vec![2025]);
        assert_eq!(years("quarterly_q2-25.txt"), vec![2025]);
        assert_eq!(years("Q4 98"), vec![2098]);
    }

    #[test]
    fn test_long_quarter() {
        assert_eq!(years("sales_Q4-2024.xlsx"), vec![2024]);
        assert_eq!(years("Q2 2023_summary.docx"), vec![2023]);
        assert_eq!(years("Q3/1999"), vec![1999]);
    }

    #[test]
    fn test_reverse_quarter() {
        assert_eq!(years("2024Q3_earnings.pdf"), vec![2024]);
        assert_eq!(years("x12024Q3"), Vec::<u16>::new());
        assert_eq!(years("2024Q31"), Vec::<u16>::new());
    }

    #[test]
    fn test_multiple_quarters() {
        assert_eq!(years("Q1/22_Q4/24_comparison.xlsx"), vec![2022, 2024]);
    }

    #[test]
    fn test_invalid_quarter_numbers() {
        assert!(quarter_years("Q5/24").is_empty());
        assert!(quarter_years("Q0-2024").is_empty());
        assert!(quarter_years("2024Q9").is_empty());
    }

    #[test]
    fn test_short_year_must_not_run_into_more_digits() {
        assert!(quarter_years("Q1/255").is_empty());
        // "Q1-2025" is a long quarter only, never "Q1-20"
        assert_eq!(
            quarter_years("Q1-2025").into_iter().map(|c| c.source).collect::<Vec<_>>(),
            vec![PatternSource::QuarterLong]
        );
    }
}
