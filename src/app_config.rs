use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::subtitle_processor::LineEnding;
use crate::validation::TimecodeValidatorConfig;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Timing validation settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Where and how shifted documents are written
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Inserted before the extension of generated files: movie.<suffix>.srt
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Line ending for written files
    #[serde(default)]
    pub line_ending: LineEnding,

    /// Replace existing output files without `--force-overwrite`
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            line_ending: LineEnding::default(),
            overwrite: false,
        }
    }
}

/// Settings for the optional timing check run after a shift
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ValidationConfig {
    /// Run the timing check after every shift
    #[serde(default)]
    pub enabled: bool,

    // @field: Shortest acceptable cue, in ms
    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: u64,

    // @field: Longest acceptable cue, in ms
    #[serde(default = "default_max_duration_ms")]
    pub max_duration_ms: u64,

    // @field: Report cues that overlap
    #[serde(default = "default_true")]
    pub check_overlaps: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_duration_ms: default_min_duration_ms(),
            max_duration_ms: default_max_duration_ms(),
            check_overlaps: true,
        }
    }
}

impl ValidationConfig {
    /// Validator settings derived from this configuration
    pub fn validator_config(&self) -> TimecodeValidatorConfig {
        TimecodeValidatorConfig {
            min_duration_ms: self.min_duration_ms,
            max_duration_ms: self.max_duration_ms,
            check_overlaps: self.check_overlaps,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_suffix() -> String {
    "shifted".to_string()
}

fn default_min_duration_ms() -> u64 {
    1
}

fn default_max_duration_ms() -> u64 {
    30_000
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let suffix = self.output.suffix.trim();
        if suffix.is_empty() {
            return Err(anyhow!("Output suffix must not be empty"));
        }
        if suffix.contains(['/', '\\']) {
            return Err(anyhow!("Output suffix must not contain path separators: {}", suffix));
        }

        if self.validation.min_duration_ms > self.validation.max_duration_ms {
            return Err(anyhow!(
                "Validation min_duration_ms ({}) exceeds max_duration_ms ({})",
                self.validation.min_duration_ms,
                self.validation.max_duration_ms
            ));
        }

        Ok(())
    }
}
