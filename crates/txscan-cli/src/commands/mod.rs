//! Subcommands and the argument helpers they share.

pub mod batch;
pub mod config;
pub mod explain;
pub mod extract;
pub mod rules;

use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use tracing::debug;

use txscan_core::models::config::TxscanConfig;
use txscan_core::{Polarity, DATE_FORMAT};

/// Load the config given by `--config`, or the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<TxscanConfig> {
    let config = if let Some(path) = config_path {
        debug!("Loading configuration from {}", path);
        TxscanConfig::from_file(Path::new(path))?
    } else {
        TxscanConfig::default()
    };
    Ok(config)
}

/// Read an OCR text file, or stdin for `-`.
pub fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    Ok(fs::read_to_string(input)?)
}

/// File stem used to name per-input outputs.
pub fn output_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("extraction")
        .to_string()
}

pub fn parse_polarity(s: &str) -> Result<Polarity, String> {
    Polarity::from_name(s).ok_or_else(|| {
        format!("unknown polarity '{}', expected income, expense or aggregate", s)
    })
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| format!("invalid date '{}', expected DD.MM.YYYY: {}", s, e))
}
