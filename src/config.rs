//! Profiler configuration
//!
//! Loaded from an optional TOML file; every field has a default so an empty
//! file (or no file at all) yields `ProfilerConfig::default()`.

use crate::record::DEFAULT_LINE_SLACK;
use crate::selector::PathResolution;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default number of lines shown per file in text output
pub const DEFAULT_TOP_LINES: usize = 10;

/// Configuration for a profiling session and its report
///
/// # Example TOML
/// ```toml
/// line_slack = 100
/// path_resolution = "canonical"
/// top = 20
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfilerConfig {
    /// Spare line slots allocated beyond the highest credited line
    ///
    /// Larger values mean fewer reallocations for long files at the cost of
    /// longer (zero-padded) line arrays in the report.
    pub line_slack: usize,

    /// How a single-file target path is resolved at session start
    pub path_resolution: PathResolution,

    /// Lines shown per file in the text report
    pub top: usize,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            line_slack: DEFAULT_LINE_SLACK,
            path_resolution: PathResolution::Verbatim,
            top: DEFAULT_TOP_LINES,
        }
    }
}

impl ProfilerConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns error if the file can't be read, isn't valid TOML, has unknown
    /// keys, or fails validation.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse TOML profiler configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde can't express
    pub fn validate(&self) -> Result<()> {
        if self.line_slack == 0 {
            anyhow::bail!("line_slack must be at least 1");
        }
        Ok(())
    }
}
