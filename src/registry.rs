//! File registry for pattern selection
//!
//! Every file identifier seen during a pattern-mode session is classified
//! exactly once. After the first sighting a lookup is a single hash probe,
//! whatever the cost of the pattern.

use crate::record::FileRecord;
use fnv::FnvHashMap;

/// Index of an accepted record inside the registry
pub type RecordIndex = usize;

/// Classification of a file identifier
#[derive(Debug, Clone, Copy)]
pub enum FileStatus<'a> {
    /// Never evaluated against the pattern
    Unseen,
    /// Evaluated, did not match; no record exists
    Rejected,
    /// Evaluated, matched; owns a record
    Accepted(&'a FileRecord),
}

impl FileStatus<'_> {
    pub fn is_unseen(&self) -> bool {
        matches!(self, FileStatus::Unseen)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, FileStatus::Rejected)
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, FileStatus::Accepted(_))
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Rejected,
    Accepted(RecordIndex),
}

/// Tri-state mapping from file identifier to its record
#[derive(Debug, Default)]
pub struct FileRegistry {
    /// Fast lookup: file identifier → classification
    slots: FnvHashMap<String, Slot>,
    /// Records owned by accepted entries
    records: Vec<FileRecord>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `file`, classifying it with `matches` on first sighting
    ///
    /// Returns the record index for accepted files and `None` for rejected
    /// ones. `matches` is never called for a file that was already classified.
    pub fn resolve<F>(&mut self, file: &str, slack: usize, matches: F) -> Option<RecordIndex>
    where
        F: FnOnce(&str) -> bool,
    {
        if let Some(slot) = self.slots.get(file) {
            return match *slot {
                Slot::Accepted(index) => Some(index),
                Slot::Rejected => None,
            };
        }

        if matches(file) {
            let index = self.records.len();
            self.records.push(FileRecord::with_slack(file, slack));
            self.slots.insert(file.to_string(), Slot::Accepted(index));
            tracing::debug!(file, "accepted file for line profiling");
            Some(index)
        } else {
            self.slots.insert(file.to_string(), Slot::Rejected);
            tracing::debug!(file, "rejected file for line profiling");
            None
        }
    }

    /// Classification of `file` without evaluating it
    pub fn status(&self, file: &str) -> FileStatus<'_> {
        match self.slots.get(file) {
            None => FileStatus::Unseen,
            Some(Slot::Rejected) => FileStatus::Rejected,
            Some(Slot::Accepted(index)) => FileStatus::Accepted(&self.records[*index]),
        }
    }

    pub fn record(&self, index: RecordIndex) -> &FileRecord {
        &self.records[index]
    }

    pub fn record_mut(&mut self, index: RecordIndex) -> &mut FileRecord {
        &mut self.records[index]
    }

    /// All accepted records, in no particular order
    pub fn accepted(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }

    /// Number of accepted files
    pub fn accepted_count(&self) -> usize {
        self.records.len()
    }

    /// Number of rejected files
    pub fn rejected_count(&self) -> usize {
        self.slots.len() - self.records.len()
    }

    /// Destroy every record and forget every classification
    pub fn clear(&mut self) {
        self.slots.clear();
        self.records.clear();
    }
}
