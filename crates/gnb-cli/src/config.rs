use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gnb_classifiers::config::GaussianNbConfig;

/// Settings for a CLI run, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub model: GaussianNbConfig,
    /// Field delimiter of the input files.
    pub delimiter: char,
    pub has_headers: bool,
    /// Zero-based index of the label column; `None` means the last column.
    pub label_column: Option<usize>,
    /// Hold-out fraction used by `evaluate` when no test file is given.
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model: GaussianNbConfig::default(),
            delimiter: ',',
            has_headers: false,
            label_column: None,
            test_fraction: 0.3,
            seed: 42,
        }
    }
}

impl RunConfig {
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .with_context(|| format!("Delimiter must be a single ASCII character, got {:?}", self.delimiter))
    }
}

/// Load a run configuration from a JSON file.
pub fn load_run_config<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: RunConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}
