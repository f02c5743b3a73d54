//! Profiling session lifecycle
//!
//! A session moves Idle → Running → Idle. At most one session runs in the
//! whole process; a second `start` fails immediately instead of waiting.
//!
//! `start` hands back an [`ActiveSession`] guard that is the subscribed line
//! hook. Dropping the guard unsubscribes and returns to Idle, which happens
//! on normal completion, on an error return and while unwinding a panic.

use crate::clock::{Clock, MonotonicClock};
use crate::config::ProfilerConfig;
use crate::dispatcher::{Dispatcher, LineHook, SelectionMode};
use crate::error::{Result, UsageError};
use crate::record::FileRecord;
use crate::registry::FileStatus;
use crate::report::LineReport;
use crate::selector::Selector;
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide enabled flag
static ENABLED: AtomicBool = AtomicBool::new(false);

/// Whether any profiling session is running in this process
pub fn is_running() -> bool {
    ENABLED.load(Ordering::Acquire)
}

/// Line profiler owning all per-session storage
///
/// # Example
/// ```
/// use lineprof::{LineHook, ManualClock, Profiler};
///
/// let clock = ManualClock::new(0);
/// let mut profiler = Profiler::with_clock(clock.clone());
///
/// let report = profiler
///     .profile(&"a.rb", Some(|hook: &mut dyn LineHook| {
///         for (t, line) in [(1000, 1), (1005, 2), (1009, 2), (1020, 3)] {
///             clock.set(t);
///             hook.line_event(Some("a.rb"), line);
///         }
///         Ok::<_, lineprof::UsageError>(())
///     }))
///     .unwrap();
///
/// let lines = report.get("a.rb").unwrap();
/// assert_eq!((lines[1], lines[2], lines[3]), (5, 15, 0));
/// ```
#[derive(Debug)]
pub struct Profiler<C = MonotonicClock> {
    dispatcher: Dispatcher<C>,
    config: ProfilerConfig,
}

impl Profiler<MonotonicClock> {
    /// Create a profiler timed by the monotonic wall clock
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for Profiler<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Profiler<C> {
    pub fn with_clock(clock: C) -> Self {
        Self::with_config(clock, ProfilerConfig::default())
    }

    pub fn with_config(clock: C, config: ProfilerConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(clock, config.line_slack.max(1)),
            config,
        }
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Profile `work`, returning per-line timings for the selected files
    ///
    /// `selector` must be a path (`String`, `&'static str`, `PathBuf`), a
    /// `Regex` or a `Selector`. Checks run in order: missing work unit,
    /// session already running, invalid selector; none of them touch stored
    /// state or run `work`. An error returned by `work` is passed through
    /// unchanged after the session has been torn down, and no report is
    /// produced.
    pub fn profile<W, T, E>(
        &mut self,
        selector: &dyn Any,
        work: Option<W>,
    ) -> std::result::Result<LineReport, E>
    where
        W: FnOnce(&mut dyn LineHook) -> std::result::Result<T, E>,
        E: From<UsageError>,
    {
        let work = work.ok_or(UsageError::NoWorkUnit)?;
        let mut active = self.start(selector)?;
        let outcome = work(&mut active);
        active.stop();

        outcome?;
        Ok(self.report())
    }

    /// Profile `work` with an already-built selector
    pub fn profile_with<W, T, E>(
        &mut self,
        selector: Selector,
        work: W,
    ) -> std::result::Result<LineReport, E>
    where
        W: FnOnce(&mut dyn LineHook) -> std::result::Result<T, E>,
        E: From<UsageError>,
    {
        self.profile(&selector, Some(work))
    }

    /// Begin a session, clearing all data from the previous one
    pub fn start(&mut self, selector: &dyn Any) -> Result<ActiveSession<'_, C>> {
        if is_running() {
            return Err(UsageError::AlreadyRunning);
        }
        let selector = Selector::from_any(selector)?;

        ENABLED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| UsageError::AlreadyRunning)?;

        tracing::debug!(%selector, "line profiling session started");
        match selector {
            Selector::Path(path) => {
                let target = self.config.path_resolution.resolve(&path);
                self.dispatcher.reset_single_file(target);
            }
            Selector::Pattern(regex) => self.dispatcher.reset_pattern(regex),
        }

        Ok(ActiveSession { profiler: self })
    }

    /// Collect the timings stored by the most recent session
    pub fn report(&self) -> LineReport {
        match self.dispatcher.mode() {
            Some(SelectionMode::SingleFile) => LineReport::single(self.dispatcher.target()),
            Some(SelectionMode::Pattern(_)) => {
                LineReport::from_records(self.dispatcher.registry().accepted())
            }
            None => LineReport::default(),
        }
    }

    pub fn mode(&self) -> Option<&SelectionMode> {
        self.dispatcher.mode()
    }

    /// Record currently holding the open interval
    pub fn active_file(&self) -> Option<&FileRecord> {
        self.dispatcher.active_file()
    }

    pub fn file_status(&self, path: &str) -> FileStatus<'_> {
        self.dispatcher.file_status(path)
    }

    /// Timings stored for `path`: the target in single-file mode, an
    /// accepted record in pattern mode
    pub fn record(&self, path: &str) -> Option<&FileRecord> {
        self.dispatcher.record(path)
    }
}

/// A running session, subscribed to line events
///
/// Dropping it ends the session.
#[derive(Debug)]
pub struct ActiveSession<'a, C: Clock> {
    profiler: &'a mut Profiler<C>,
}

impl<C: Clock> ActiveSession<'_, C> {
    /// End the session
    pub fn stop(self) {}

    pub fn active_file(&self) -> Option<&FileRecord> {
        self.profiler.active_file()
    }

    pub fn file_status(&self, path: &str) -> FileStatus<'_> {
        self.profiler.file_status(path)
    }

    pub fn record(&self, path: &str) -> Option<&FileRecord> {
        self.profiler.record(path)
    }
}

impl<C: Clock> LineHook for ActiveSession<'_, C> {
    fn line_event(&mut self, file: Option<&str>, line: i64) {
        self.profiler.dispatcher.dispatch(file, line);
    }
}

impl<C: Clock> Drop for ActiveSession<'_, C> {
    fn drop(&mut self) {
        ENABLED.store(false, Ordering::Release);
        tracing::debug!(
            panicking = std::thread::panicking(),
            "line profiling session stopped"
        );
    }
}
