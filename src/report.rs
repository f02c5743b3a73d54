//! Line timing report
//!
//! Maps each profiled file to its per-line microsecond counters. Arrays are
//! copied out at capacity length: index 0 is unused and trailing slack slots
//! are zero, so an array is usually longer than the file it describes.

use crate::record::FileRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single line's accumulated time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTiming<'a> {
    pub file: &'a str,
    pub line: usize,
    pub micros: u64,
}

/// Per-file line timings from one session
///
/// Iteration order across files is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineReport {
    files: HashMap<String, Vec<u64>>,
}

impl LineReport {
    /// Report for single-file mode: exactly one entry, even if nothing ran
    pub fn single(record: &FileRecord) -> Self {
        let mut files = HashMap::with_capacity(1);
        files.insert(record.filename().to_string(), record.lines().to_vec());
        Self { files }
    }

    /// Report for pattern mode: one entry per accepted record
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a FileRecord>,
    {
        let files = records
            .into_iter()
            .map(|record| (record.filename().to_string(), record.lines().to_vec()))
            .collect();
        Self { files }
    }

    /// Line array for `file`
    pub fn get(&self, file: &str) -> Option<&[u64]> {
        self.files.get(file).map(Vec::as_slice)
    }

    pub fn contains(&self, file: &str) -> bool {
        self.files.contains_key(file)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u64])> {
        self.files
            .iter()
            .map(|(file, lines)| (file.as_str(), lines.as_slice()))
    }

    /// Files sorted by path, for stable output
    pub fn sorted_files(&self) -> Vec<(&str, &[u64])> {
        let mut files: Vec<_> = self.iter().collect();
        files.sort_by(|a, b| a.0.cmp(b.0));
        files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total time attributed to `file`
    pub fn file_micros(&self, file: &str) -> u64 {
        self.get(file).map(|lines| lines.iter().sum()).unwrap_or(0)
    }

    /// Total time attributed across all files
    pub fn total_micros(&self) -> u64 {
        self.files.values().flatten().sum()
    }

    /// Non-zero lines across all files, slowest first
    ///
    /// Ties are ordered by path then line number. `limit` of `None` returns
    /// every non-zero line.
    pub fn hotspots(&self, limit: Option<usize>) -> Vec<LineTiming<'_>> {
        let mut timings: Vec<LineTiming<'_>> = self
            .iter()
            .flat_map(|(file, lines)| non_zero_lines(file, lines))
            .collect();

        timings.sort_by(|a, b| {
            b.micros
                .cmp(&a.micros)
                .then_with(|| a.file.cmp(b.file))
                .then_with(|| a.line.cmp(&b.line))
        });

        if let Some(limit) = limit {
            timings.truncate(limit);
        }
        timings
    }
}

impl From<HashMap<String, Vec<u64>>> for LineReport {
    fn from(files: HashMap<String, Vec<u64>>) -> Self {
        Self { files }
    }
}

/// Non-zero lines of one file, in line order
pub fn non_zero_lines<'a>(file: &'a str, lines: &'a [u64]) -> impl Iterator<Item = LineTiming<'a>> {
    lines
        .iter()
        .enumerate()
        .filter(|&(_, &micros)| micros > 0)
        .map(move |(line, &micros)| LineTiming { file, line, micros })
}
