//! Record module - the input unit of a batch

/// One input row: a unique id and the combined free text for that id
///
/// The combined text is produced upstream by concatenating several metadata
/// columns; it may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    /// Unique key within a batch
    pub id: String,

    /// Flattened free text to scan for years
    pub combined_text: String,
}

impl Record {
    /// Create a new record
    ///
    /// # Examples
    ///
    /// ```
    /// use yearscan_domain::Record;
    ///
    /// let record = Record::new("42", "invoice_01.12.2025.pdf");
    /// assert_eq!(record.id, "42");
    /// ```
    pub fn new(id: impl Into<String>, combined_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            combined_text: combined_text.into(),
        }
    }
}
