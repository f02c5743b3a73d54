//! JSON output format for line reports
//!
//! `--format json`: the full per-line arrays plus a summary, so the output
//! can be fed back into other tooling without losing slack slots.

use crate::report::LineReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics for the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    /// Number of files in the report
    pub files: usize,
    /// Total attributed time in microseconds
    pub total_time_us: u64,
    /// Number of events replayed (if known)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<u64>,
}

/// A hot line in the summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonHotspot {
    pub file: String,
    pub line: usize,
    pub time_us: u64,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    /// Selector the session ran with
    pub selector: String,
    /// Per-file line arrays, keyed by path (sorted for stable output)
    pub files: BTreeMap<String, Vec<u64>>,
    /// Slowest lines across all files
    pub hotspots: Vec<JsonHotspot>,
    /// Summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the JSON document for `report`
    pub fn new(selector: impl Into<String>, report: &LineReport, top: usize) -> Self {
        let hotspots = report
            .hotspots(Some(top))
            .into_iter()
            .map(|timing| JsonHotspot {
                file: timing.file.to_string(),
                line: timing.line,
                time_us: timing.micros,
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "lineprof-json-v1".to_string(),
            selector: selector.into(),
            files: report
                .iter()
                .map(|(file, lines)| (file.to_string(), lines.to_vec()))
                .collect(),
            hotspots,
            summary: JsonSummary {
                files: report.len(),
                total_time_us: report.total_micros(),
                events: None,
            },
        }
    }

    /// Record how many events produced this report
    pub fn set_event_count(&mut self, events: u64) {
        self.summary.events = Some(events);
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
