//! Scan command implementation.

use crate::cli::ScanArgs;
use std::io::{self, Write};
use yearscan_rules::RuleBasedYearExtractor;

/// Execute the scan command.
pub fn execute_scan(args: ScanArgs) -> io::Result<()> {
    let stdout = io::stdout();
    render_scan(&args.text, &mut stdout.lock())
}

/// Write the extracted year followed by one line per candidate.
pub fn render_scan<W: Write>(text: &str, out: &mut W) -> io::Result<()> {
    let extractor = RuleBasedYearExtractor::new();
    let year = extractor.extract(text);

    if year.is_empty() {
        writeln!(out, "year: (none)")?;
    } else {
        writeln!(out, "year: {}", year)?;
    }
    for candidate in extractor.extract_candidates(text) {
        let kind = if candidate.source.is_calendar_date() { "date" } else { "quarter" };
        writeln!(out, "  {:<8} {:<16} {}", kind, candidate.source.as_str(), candidate.year)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> String {
        let mut out = Vec::new();
        render_scan(text, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_scan_lists_candidates() {
        let output = scan("Q1/22_Q4/24_comparison.xlsx");
        assert!(output.starts_with("year: 2024\n"));
        assert_eq!(output.lines().count(), 3);
        assert!(output.lines().skip(1).all(|line| line.trim_start().starts_with("quarter")));
    }

    #[test]
    fn test_scan_labels_dates() {
        let output = scan("invoice_01.12.2025.pdf");
        assert!(output.lines().nth(1).unwrap().trim_start().starts_with("date"));
    }

    #[test]
    fn test_scan_without_match() {
        assert_eq!(scan("2020 2021 2022"), "year: (none)\n");
    }
}
