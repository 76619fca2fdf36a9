//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TxscanError};

/// Main configuration for txscan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxscanConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Comments longer than this many characters are truncated.
    pub comment_max_chars: usize,

    /// Use the reference date for aggregate screenshots without a date.
    pub fill_aggregate_date: bool,

    /// Additional author stop-list tokens.
    pub extra_stop_words: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            comment_max_chars: 200,
            fill_aggregate_date: true,
            extra_stop_words: Vec::new(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty_json: bool,
}

impl TxscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.extraction.comment_max_chars < 3 {
            return Err(TxscanError::Config(format!(
                "extraction.comment_max_chars must be at least 3, got {}",
                self.extraction.comment_max_chars
            )));
        }
        if self.extraction.extra_stop_words.iter().any(|w| w.trim().is_empty()) {
            return Err(TxscanError::Config(
                "extraction.extra_stop_words must not contain empty entries".to_string(),
            ));
        }
        Ok(())
    }
}
