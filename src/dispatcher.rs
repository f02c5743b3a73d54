//! Line event dispatcher
//!
//! Runs once per executed line on the host's hot path:
//! - resolves the file through the selection (single target or registry)
//! - samples the clock only for files in scope
//! - credits the elapsed interval to the line being left
//! - switches the active file, closing the previous file's open interval
//!
//! Time spent in files outside the selection produces no events, so it is
//! folded into whichever in-scope line was active when control left scope.

use crate::clock::Clock;
use crate::record::FileRecord;
use crate::registry::{FileRegistry, FileStatus, RecordIndex};
use regex::Regex;

/// Receiver of the host's per-line notifications
pub trait LineHook {
    /// Called synchronously, in program order, for every executed line
    ///
    /// `file` is `None` when the host has no file for the line; such events
    /// and events with `line <= 0` are ignored.
    fn line_event(&mut self, file: Option<&str>, line: i64);
}

/// How files are selected for the current session
#[derive(Debug, Clone)]
pub enum SelectionMode {
    /// One target file, held directly without registry overhead
    SingleFile,
    /// Any file matching the pattern, tracked in the registry
    Pattern(Regex),
}

/// Handle to a record owned by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordId {
    Target,
    Registered(RecordIndex),
}

/// Tracks which record currently holds the open interval
#[derive(Debug, Default)]
pub(crate) struct ActiveFileTracker {
    current: Option<RecordId>,
}

impl ActiveFileTracker {
    /// Make `id` active, returning the previously active record if it differs
    pub(crate) fn switch_to(&mut self, id: RecordId) -> Option<RecordId> {
        match self.current.replace(id) {
            Some(previous) if previous != id => Some(previous),
            _ => None,
        }
    }

    pub(crate) fn current(&self) -> Option<RecordId> {
        self.current
    }

    pub(crate) fn reset(&mut self) {
        self.current = None;
    }
}

/// Per-session accounting state
#[derive(Debug)]
pub struct Dispatcher<C> {
    clock: C,
    slack: usize,
    mode: Option<SelectionMode>,
    /// Single-file fast path; its filename is the resolved target
    target: FileRecord,
    /// Pattern-mode storage, kept between sessions and cleared on reset
    registry: FileRegistry,
    active: ActiveFileTracker,
}

impl<C: Clock> Dispatcher<C> {
    pub fn new(clock: C, slack: usize) -> Self {
        Self {
            clock,
            slack,
            mode: None,
            target: FileRecord::with_slack("", slack),
            registry: FileRegistry::new(),
            active: ActiveFileTracker::default(),
        }
    }

    /// Drop all stored timings and select files for a new session
    pub fn reset_single_file(&mut self, target: impl Into<String>) {
        self.clear();
        self.target = FileRecord::with_slack(target, self.slack);
        self.mode = Some(SelectionMode::SingleFile);
    }

    /// Drop all stored timings and select files matching `pattern`
    pub fn reset_pattern(&mut self, pattern: Regex) {
        self.clear();
        self.mode = Some(SelectionMode::Pattern(pattern));
    }

    fn clear(&mut self) {
        self.registry.clear();
        self.target = FileRecord::with_slack("", self.slack);
        self.active.reset();
    }

    /// Handle one line event
    pub fn dispatch(&mut self, file: Option<&str>, line: i64) {
        let Some(file) = file else {
            return;
        };
        let line = match usize::try_from(line) {
            Ok(line) if line > 0 => line,
            _ => return,
        };
        let Some(id) = self.resolve(file) else {
            return;
        };

        let now = self.clock.now_micros();
        self.lookup_mut(id).sample(line, now);

        if let Some(previous) = self.active.switch_to(id) {
            self.lookup_mut(previous).close_interval();
        }
    }

    /// Map a file identifier to its record, classifying it if needed
    fn resolve(&mut self, file: &str) -> Option<RecordId> {
        match &self.mode {
            None => None,
            Some(SelectionMode::SingleFile) => {
                (self.target.filename() == file).then_some(RecordId::Target)
            }
            Some(SelectionMode::Pattern(regex)) => self
                .registry
                .resolve(file, self.slack, |path| regex.is_match(path))
                .map(RecordId::Registered),
        }
    }

    fn lookup(&self, id: RecordId) -> &FileRecord {
        match id {
            RecordId::Target => &self.target,
            RecordId::Registered(index) => self.registry.record(index),
        }
    }

    fn lookup_mut(&mut self, id: RecordId) -> &mut FileRecord {
        match id {
            RecordId::Target => &mut self.target,
            RecordId::Registered(index) => self.registry.record_mut(index),
        }
    }

    pub fn mode(&self) -> Option<&SelectionMode> {
        self.mode.as_ref()
    }

    /// Record currently accumulating time, if any
    pub fn active_file(&self) -> Option<&FileRecord> {
        self.active.current().map(|id| self.lookup(id))
    }

    /// The single-file target record
    pub fn target(&self) -> &FileRecord {
        &self.target
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    /// Classification of `path` in the current session
    ///
    /// In single-file mode the target is the only accepted file and nothing is
    /// ever classified as rejected.
    pub fn file_status(&self, path: &str) -> FileStatus<'_> {
        match &self.mode {
            Some(SelectionMode::SingleFile) if self.target.filename() == path => {
                FileStatus::Accepted(&self.target)
            }
            Some(SelectionMode::Pattern(_)) => self.registry.status(path),
            _ => FileStatus::Unseen,
        }
    }

    /// Record holding `path`'s timings, if `path` is in scope
    pub fn record(&self, path: &str) -> Option<&FileRecord> {
        match self.file_status(path) {
            FileStatus::Accepted(record) => Some(record),
            FileStatus::Unseen | FileStatus::Rejected => None,
        }
    }
}

impl<C: Clock> LineHook for Dispatcher<C> {
    fn line_event(&mut self, file: Option<&str>, line: i64) {
        self.dispatch(file, line);
    }
}
