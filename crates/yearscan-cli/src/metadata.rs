//! Flattening of metadata exports into `id,combined` rows.
//!
//! A metadata export carries the file name and a chain of parent folder
//! names per document. Those columns are cleaned and joined into the single
//! free-text field the extractor works on.

use crate::error::{CliError, Result};
use crate::io::{column_index, ID_COLUMN, TEXT_COLUMN};
use regex::Regex;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{info, warn};

/// Optional columns taken as-is, in this order, before the parent chain
const FIXED_COLUMNS: &[&str] = &["filename", "parent"];

/// The first parent level is always the archive root and carries no information
const SKIPPED_PARENT: &str = "Parent1";

static ID_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\d+\)\s*").expect("id suffix pattern is valid"));

static MISSING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(nan|NaN|None)\b").expect("missing marker pattern is valid"));

/// Row counts of a flattening run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombineSummary {
    /// Data rows read
    pub rows_read: usize,
    /// Data rows written
    pub rows_written: usize,
}

/// Flatten the metadata file at `input` into `output`.
pub fn combine_file(input: &Path, output: &Path, delimiter: char) -> Result<CombineSummary> {
    info!("Reading metadata from {}", input.display());
    let reader = std::fs::File::open(input)?;
    let writer = std::fs::File::create(output)?;
    let summary = combine(reader, writer, delimiter, input)?;
    info!("Wrote {} rows to {}", summary.rows_written, output.display());
    Ok(summary)
}

/// Flatten metadata rows from `reader` into `id,combined` rows on `writer`.
///
/// `source` only names the input in error messages.
pub fn combine<R: Read, W: Write>(reader: R, writer: W, delimiter: char, source: &Path) -> Result<CombineSummary> {
    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| CliError::InvalidInput(format!("delimiter '{}' is not a single ASCII character", delimiter)))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let id_index = column_index(&headers, ID_COLUMN, source)?;
    let text_columns = select_columns(&headers);

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([ID_COLUMN, TEXT_COLUMN])?;

    let mut summary = CombineSummary {
        rows_read: 0,
        rows_written: 0,
    };
    for row in reader.records() {
        let row = row?;
        summary.rows_read += 1;

        let combined = text_columns
            .iter()
            .filter_map(|&index| row.get(index))
            .map(clean_value)
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        writer.write_record([row.get(id_index).unwrap_or_default(), combined.as_str()])?;
        summary.rows_written += 1;
    }
    writer.flush()?;

    if summary.rows_read == summary.rows_written {
        info!("Row count OK: {} rows in, {} rows out", summary.rows_read, summary.rows_written);
    } else {
        warn!(
            "Row count mismatch: {} rows in, {} rows out",
            summary.rows_read, summary.rows_written
        );
    }

    Ok(summary)
}

/// Indices of the text columns: `filename`, `parent`, then the parent chain.
fn select_columns(headers: &csv::StringRecord) -> Vec<usize> {
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    let fixed = FIXED_COLUMNS.iter().filter_map(|name| position(name));
    let parents = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.contains("Parent") && h.trim() != SKIPPED_PARENT)
        .map(|(index, _)| index);

    fixed.chain(parents).collect()
}

/// Clean one metadata value.
///
/// Removes `(12345)` id suffixes, `nan`/`None` placeholders, tabs and double
/// quotes, then collapses whitespace.
pub fn clean_value(raw: &str) -> String {
    let value = ID_SUFFIX.replace_all(raw, "");
    let value = MISSING_MARKER.replace_all(&value, "");
    let value = value.replace(['\t', '"'], "");
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> String {
        let mut output = Vec::new();
        combine(input.as_bytes(), &mut output, ';', Path::new("meta.csv")).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value("Bauakte (12345) Nord"), "Bauakte Nord");
        assert_eq!(clean_value("nan"), "");
        assert_eq!(clean_value("None"), "");
        assert_eq!(clean_value("Nonetheless"), "Nonetheless");
        assert_eq!(clean_value("\t\"Plan\"   2019 "), "Plan 2019");
    }

    #[test]
    fn test_combines_selected_columns() {
        let input = "id;filename;parent;Parent1;Parent2;Parent3;size\n\
                     7;plan_2019-03-01.pdf;Bauakte (991);Archiv;Haus A;nan;12\n";
        assert_eq!(run(input), "id,combined\n7,plan_2019-03-01.pdf Bauakte Haus A\n");
    }

    #[test]
    fn test_missing_optional_columns_are_skipped() {
        let input = "id;Parent2\n1;Ordner\n2;\n";
        assert_eq!(run(input), "id,combined\n1,Ordner\n2,\n");
    }

    #[test]
    fn test_missing_id_column_is_fatal() {
        let mut output = Vec::new();
        let result = combine("filename;parent\na;b\n".as_bytes(), &mut output, ';', Path::new("meta.csv"));
        assert!(matches!(result, Err(CliError::MissingColumn { ref column, .. }) if column == "id"));
    }

    #[test]
    fn test_rejects_non_ascii_delimiter() {
        let mut output = Vec::new();
        let result = combine("id\n1\n".as_bytes(), &mut output, '§', Path::new("meta.csv"));
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_summary_counts_rows() {
        let mut output = Vec::new();
        let summary = combine("id;filename\n1;a\n2;b\n".as_bytes(), &mut output, ';', Path::new("m")).unwrap();
        assert_eq!(summary, CombineSummary { rows_read: 2, rows_written: 2 });
    }
}
