//! lineprof - line-level wall-clock profiler core
//!
//! This library attaches to an interpreter's line-execution notifications
//! and accumulates the wall-clock time spent on each source line of the
//! selected files: a single exact path, or every file matching a pattern.
//! Recorded traces can be replayed through the same engine.

pub mod cli;
pub mod clock;
pub mod config;
pub mod csv_output;
pub mod dispatcher;
pub mod error;
pub mod json_output;
pub mod record;
pub mod registry;
pub mod replay;
pub mod report;
pub mod selector;
pub mod session;
pub mod text_output;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::ProfilerConfig;
pub use dispatcher::{LineHook, SelectionMode};
pub use error::UsageError;
pub use record::FileRecord;
pub use registry::FileStatus;
pub use report::LineReport;
pub use selector::{PathResolution, Selector};
pub use session::{is_running, ActiveSession, Profiler};
