//! Configuration for the pipeline

use serde::{Deserialize, Serialize};
use yearscan_domain::is_plausible_year;

/// Years the model is known to invent; used by the [`verified`](ExtractorConfig::verified) preset
pub const STANDARD_BLACKLIST: &[&str] = &[
    "1900", "2025", "2027", "2029", "2031", "2032", "2033", "2037", "2039", "2040", "2093", "2100",
];

/// Configuration for the record classification pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Send records the rules cannot resolve to the language model
    pub enable_ai_process: bool,

    /// Year written for AI records without a usable answer
    pub not_found_return_value: String,

    /// Run the plausibility checks on AI-resolved years
    pub verify_ai_results: bool,

    /// AI years that are always rejected by verification
    pub blacklist_years: Vec<String>,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let value = self.not_found_return_value.trim();
        if value.len() == 4 && value.parse::<u32>().is_ok_and(is_plausible_year) {
            return Err(format!(
                "not_found_return_value '{}' would be indistinguishable from a real year",
                value
            ));
        }
        for year in &self.blacklist_years {
            if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format!("blacklist entry '{}' is not a four-digit year", year));
            }
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration: rules first, model fallback on, no verification
    fn default() -> Self {
        Self {
            enable_ai_process: true,
            not_found_return_value: "0".to_string(),
            verify_ai_results: false,
            blacklist_years: Vec::new(),
        }
    }
}

impl ExtractorConfig {
    /// Rules-only preset: the model is never contacted
    pub fn rules_only() -> Self {
        Self {
            enable_ai_process: false,
            ..Self::default()
        }
    }

    /// Verified preset: model fallback plus plausibility checks and the standard blacklist
    pub fn verified() -> Self {
        Self {
            verify_ai_results: true,
            blacklist_years: STANDARD_BLACKLIST.iter().map(|y| y.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
