//! Normalization of free-form model output
//!
//! Model answers are multi-line, quoted, comma-laden prose. [`sanitize`]
//! turns them into a single CSV-safe scalar; [`extract_year_token`] pulls the
//! year out and rejects anything implausible.

use regex::Regex;
use std::sync::LazyLock;
use yearscan_domain::{is_plausible_year, YEAR_SENTINEL};

/// Replacement for line breaks, tabs, non-breaking spaces and commas
pub const DELIMITER: &str = "#";

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit run pattern is valid"));

/// Make a model answer safe to store in one CSV cell
///
/// The steps run in a fixed order; later steps never undo earlier ones, and
/// the output is a fixed point (`sanitize(sanitize(x)) == sanitize(x)`).
///
/// # Examples
///
/// ```
/// use yearscan_extractor::sanitize;
///
/// assert_eq!(sanitize("Year:\n\"2024\", probably"), "Year:#2024# probably");
/// ```
pub fn sanitize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let text = raw.replace(['\n', '\r', '\t'], DELIMITER);
    let text = text.replace('\u{00A0}', DELIMITER).replace('\u{200B}', "");
    let text = text.replace('"', "");
    let text = text.replace(',', DELIMITER);

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first run of exactly four digits, if it is a plausible year
///
/// Returns [`YEAR_SENTINEL`] when there is no such run, or when the first one
/// lies outside 1900–2100.
///
/// # Examples
///
/// ```
/// use yearscan_extractor::extract_year_token;
///
/// assert_eq!(extract_year_token("Year: 2024"), "2024");
/// assert_eq!(extract_year_token("Year: 1850"), "0");
/// assert_eq!(extract_year_token("no idea"), "0");
/// ```
pub fn extract_year_token(text: &str) -> String {
    DIGIT_RUN
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|run| run.len() == 4)
        .filter(|run| run.parse::<u32>().is_ok_and(is_plausible_year))
        .map(str::to_string)
        .unwrap_or_else(|| YEAR_SENTINEL.to_string())
}
