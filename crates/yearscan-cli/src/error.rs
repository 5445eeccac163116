//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required column is missing from an input file
    #[error("Missing column '{column}' in {path}")]
    MissingColumn {
        /// Column name
        column: String,
        /// File that lacks it
        path: String,
    },

    /// Pipeline error
    #[error("Extraction error: {0}")]
    Extractor(#[from] yearscan_extractor::ExtractorError),

    /// Inference client setup error
    #[error("LLM error: {0}")]
    Llm(#[from] yearscan_llm::LlmError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
