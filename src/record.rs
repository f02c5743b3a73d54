//! Per-file line timing accumulator
//!
//! A `FileRecord` holds one file's cumulative microseconds per source line,
//! indexed by 1-based line number (index 0 is never written). The line table
//! is allocated lazily on the first credit and grows by a fixed slack past
//! the highest line credited so far.

/// Default number of spare slots allocated beyond the line being credited
pub const DEFAULT_LINE_SLACK: usize = 100;

/// Accumulated timing state for a single source file
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Owned copy of the host's file identifier
    filename: String,
    /// Microseconds per line; only ever incremented
    lines: Vec<u64>,
    /// Spare slots added on each growth
    slack: usize,
    /// Start of the open interval, if any
    last_time: Option<u64>,
    /// Line the open interval is attributed to
    last_line: usize,
}

impl FileRecord {
    /// Create an empty record with the default growth slack
    pub fn new(filename: impl Into<String>) -> Self {
        Self::with_slack(filename, DEFAULT_LINE_SLACK)
    }

    /// Create an empty record that grows `slack` slots past each new high line
    pub fn with_slack(filename: impl Into<String>, slack: usize) -> Self {
        Self {
            filename: filename.into(),
            lines: Vec::new(),
            slack: slack.max(1),
            last_time: None,
            last_line: 0,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Per-line counters, capacity-length
    pub fn lines(&self) -> &[u64] {
        &self.lines
    }

    /// Number of allocated line slots
    pub fn capacity(&self) -> usize {
        self.lines.len()
    }

    /// Whether this record has an open interval
    pub fn is_open(&self) -> bool {
        self.last_time.is_some()
    }

    /// Line that will receive the open interval's time, if one is open
    pub fn last_line(&self) -> Option<usize> {
        self.last_time.map(|_| self.last_line)
    }

    /// Record that `line` started executing at `now`
    ///
    /// Time since the previous sample is credited to the line being left.
    /// The first sample after the record was opened (or reopened) credits
    /// nothing.
    pub fn sample(&mut self, line: usize, now: u64) {
        if let Some(last_time) = self.last_time {
            let elapsed = now.saturating_sub(last_time);
            self.credit(self.last_line, elapsed);
        }

        self.last_time = Some(now);
        self.last_line = line;
    }

    /// Close the open interval without crediting it
    pub fn close_interval(&mut self) {
        self.last_time = None;
    }

    /// Add `micros` to `line`, growing the table first if needed
    pub fn credit(&mut self, line: usize, micros: u64) {
        self.ensure_line(line);
        self.lines[line] += micros;
    }

    /// Grow the table so `line` is a valid index
    ///
    /// New slots are zero-filled; existing counters are preserved.
    fn ensure_line(&mut self, line: usize) {
        if line >= self.lines.len() {
            self.lines.resize(line + self.slack, 0);
        }
    }
}
