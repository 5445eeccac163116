//! CSV input and output for extraction runs.

use crate::error::{CliError, Result};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use tracing::warn;
use yearscan_domain::{ExtractionResult, Record};

/// Column holding the record id
pub const ID_COLUMN: &str = "id";

/// Column holding the flattened record text
pub const TEXT_COLUMN: &str = "combined";

/// Read every record of an `id,combined` CSV file.
///
/// The whole file is read and checked before anything is written, so a bad
/// input never leaves a partial output behind. Repeated rows are dropped,
/// keeping the first; every id appears exactly once in the result.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    let id_index = column_index(&headers, ID_COLUMN, path)?;
    let text_index = column_index(&headers, TEXT_COLUMN, path)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(Record::new(
            row.get(id_index).unwrap_or_default(),
            row.get(text_index).unwrap_or_default(),
        ));
    }

    dedup_records(records)
}

/// Position of a named column in a header row.
pub fn column_index(headers: &csv::StringRecord, column: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| CliError::MissingColumn {
            column: column.to_string(),
            path: path.display().to_string(),
        })
}

/// Drop repeated rows; reject blank ids and ids that appear with different text.
fn dedup_records(records: Vec<Record>) -> Result<Vec<Record>> {
    let total = records.len();
    let mut seen: HashMap<String, String> = HashMap::with_capacity(total);
    let mut unique = Vec::with_capacity(total);

    for (line, record) in records.into_iter().enumerate() {
        if record.id.trim().is_empty() {
            return Err(CliError::InvalidInput(format!("empty id in data row {}", line + 1)));
        }
        match seen.get(&record.id) {
            Some(text) if *text != record.combined_text => {
                return Err(CliError::InvalidInput(format!(
                    "id '{}' appears with different text",
                    record.id
                )));
            }
            Some(_) => {}
            None => {
                seen.insert(record.id.clone(), record.combined_text.clone());
                unique.push(record);
            }
        }
    }

    let dropped = total - unique.len();
    if dropped > 0 {
        warn!("Dropped {} repeated rows", dropped);
    }
    Ok(unique)
}

/// Writes `id,year,origin[,combined]` rows.
pub struct ResultWriter<W: Write> {
    writer: csv::Writer<W>,
    include_combined: bool,
    rows_written: usize,
}

impl<W: Write> ResultWriter<W> {
    /// Create a writer and emit the header row.
    pub fn new(inner: W, include_combined: bool) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        if include_combined {
            writer.write_record(["id", "year", "origin", TEXT_COLUMN])?;
        } else {
            writer.write_record(["id", "year", "origin"])?;
        }
        Ok(Self {
            writer,
            include_combined,
            rows_written: 0,
        })
    }

    /// Append one batch of results and flush.
    pub fn write_batch(&mut self, results: &[ExtractionResult], records: &[Record]) -> Result<()> {
        let texts: HashMap<&str, &str> = if self.include_combined {
            records
                .iter()
                .map(|r| (r.id.as_str(), r.combined_text.as_str()))
                .collect()
        } else {
            HashMap::new()
        };

        for result in results {
            let origin = result.origin.as_str();
            if self.include_combined {
                let text = texts.get(result.id.as_str()).copied().unwrap_or_default();
                self.writer.write_record([result.id.as_str(), result.year.as_str(), origin, text])?;
            } else {
                self.writer.write_record([result.id.as_str(), result.year.as_str(), origin])?;
            }
        }
        self.writer.flush()?;
        self.rows_written += results.len();
        Ok(())
    }

    /// Number of data rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and return the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| CliError::Io(e.into_error()))
    }
}
