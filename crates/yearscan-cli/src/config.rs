//! Configuration management for the CLI.

use crate::cli::ExtractArgs;
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use yearscan_extractor::ExtractorConfig;
use yearscan_llm::LlmSettings;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Pipeline settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Inference endpoint settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Input/output settings
    #[serde(default)]
    pub io: IoSettings,
}

/// Input/output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IoSettings {
    /// Records per chunk (0 = whole file)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Ask before every chunk
    #[serde(default)]
    pub prompt_after_chunk: bool,

    /// Copy the `combined` text into the output
    #[serde(default)]
    pub include_combined: bool,
}

impl CliConfig {
    /// Load configuration from a file, or use defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let contents = fs::read_to_string(path)?;
                let config: CliConfig = toml::from_str(&contents)?;
                config.validate()?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Validate all sections.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate().map_err(CliError::Config)?;
        self.llm
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(())
    }

    /// Apply command-line overrides for the extract command.
    pub fn apply_extract_args(&mut self, args: &ExtractArgs) {
        if args.no_ai {
            self.extractor.enable_ai_process = false;
        }
        if args.verify {
            self.extractor.verify_ai_results = true;
        }
        if let Some(chunk_size) = args.chunk_size {
            self.io.chunk_size = chunk_size;
        }
        if args.yes {
            self.io.prompt_after_chunk = false;
        }
        if args.include_combined {
            self.io.include_combined = true;
        }
        if let Some(endpoint) = &args.endpoint {
            self.llm.endpoint = endpoint.clone();
        }
        if let Some(model) = &args.model {
            self.llm.model = model.clone();
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            extractor: ExtractorConfig::default(),
            llm: LlmSettings::default(),
            io: IoSettings::default(),
        }
    }
}

impl Default for IoSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            prompt_after_chunk: false,
            include_combined: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_chunk_size() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn extract_args() -> ExtractArgs {
        ExtractArgs {
            input: PathBuf::from("in.csv"),
            output: PathBuf::from("out.csv"),
            no_ai: false,
            verify: false,
            chunk_size: None,
            yes: false,
            include_combined: false,
            endpoint: None,
            model: None,
        }
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.io.chunk_size, 1000);
        assert!(config.extractor.enable_ai_process);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_sections() {
        let toml_str = r#"
            log_level = "debug"

            [extractor]
            enable_ai_process = false
            not_found_return_value = "none"

            [llm]
            model = "mistral-7b"

            [io]
            chunk_size = 50
            prompt_after_chunk = true
        "#;

        let config: CliConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(!config.extractor.enable_ai_process);
        assert_eq!(config.extractor.not_found_return_value, "none");
        assert_eq!(config.llm.model, "mistral-7b");
        assert_eq!(config.llm.max_tokens, 150);
        assert_eq!(config.io.chunk_size, 50);
        assert!(config.io.prompt_after_chunk);
        assert!(!config.io.include_combined);
    }

    #[test]
    fn test_flags_override_file() {
        let mut config = CliConfig::default();
        config.io.prompt_after_chunk = true;

        let mut args = extract_args();
        args.no_ai = true;
        args.yes = true;
        args.chunk_size = Some(0);
        args.model = Some("other".to_string());
        config.apply_extract_args(&args);

        assert!(!config.extractor.enable_ai_process);
        assert!(!config.io.prompt_after_chunk);
        assert_eq!(config.io.chunk_size, 0);
        assert_eq!(config.llm.model, "other");
    }

    #[test]
    fn test_absent_flags_keep_file_values() {
        let mut config = CliConfig::default();
        config.io.chunk_size = 10;
        config.apply_extract_args(&extract_args());
        assert_eq!(config.io.chunk_size, 10);
        assert!(config.extractor.enable_ai_process);
    }
}
