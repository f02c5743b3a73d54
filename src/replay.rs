//! Replay of recorded line-event traces
//!
//! A trace is JSON Lines, one event per line:
//!
//! ```text
//! {"file": "app/models/user.rb", "line": 12, "t_us": 1000}
//! {"file": null, "line": 3, "t_us": 1004}
//! ```
//!
//! Replay drives the profiler the same way a live host does: the recorded
//! timestamp is loaded into a [`ManualClock`] and the event is delivered to
//! the subscribed hook.

use crate::clock::ManualClock;
use crate::config::ProfilerConfig;
use crate::dispatcher::LineHook;
use crate::report::LineReport;
use crate::selector::Selector;
use crate::session::Profiler;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// One recorded line event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// File identifier reported by the host, if any
    pub file: Option<String>,
    /// Line number as reported by the host (may be non-positive)
    pub line: i64,
    /// Timestamp in microseconds
    pub t_us: u64,
}

/// Highest line number a trace event may carry
///
/// Line tables are sized by the highest credited line, so an unbounded line
/// number would request an unbounded allocation.
pub const MAX_TRACE_LINE: i64 = 10_000_000;

/// Parse one trace line; blank lines yield `None`
pub fn parse_event_line(text: &str) -> Result<Option<TraceEvent>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let event = serde_json::from_str(text).context("Invalid trace event")?;
    Ok(Some(event))
}

/// Parse a whole trace
///
/// # Errors
/// Fails on malformed events, on line numbers above [`MAX_TRACE_LINE`] and on
/// timestamps that go backward, naming the offending line.
pub fn parse_trace<R: BufRead>(reader: R) -> Result<Vec<TraceEvent>> {
    let mut events: Vec<TraceEvent> = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.with_context(|| format!("Failed to read trace line {}", number))?;
        let Some(event) =
            parse_event_line(&line).with_context(|| format!("Trace line {}", number))?
        else {
            continue;
        };

        if event.line > MAX_TRACE_LINE {
            anyhow::bail!(
                "Trace line {}: line number {} exceeds the maximum of {}",
                number,
                event.line,
                MAX_TRACE_LINE
            );
        }

        if let Some(previous) = events.last() {
            if event.t_us < previous.t_us {
                anyhow::bail!(
                    "Trace line {}: timestamp {} goes backward (previous {})",
                    number,
                    event.t_us,
                    previous.t_us
                );
            }
        }
        events.push(event);
    }

    Ok(events)
}

/// Read a trace from a file, or from stdin when `path` is `-`
pub fn read_trace(path: &Path) -> Result<Vec<TraceEvent>> {
    if path == Path::new("-") {
        return parse_trace(io::stdin().lock()).context("Failed to read trace from stdin");
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open trace file: {}", path.display()))?;
    parse_trace(BufReader::new(file))
        .with_context(|| format!("Failed to parse trace file: {}", path.display()))
}

/// Deliver `events` to `hook`, advancing `clock` to each event's timestamp
pub fn replay(events: &[TraceEvent], clock: &ManualClock, hook: &mut dyn LineHook) -> u64 {
    let mut delivered = 0;
    for event in events {
        clock.set(event.t_us);
        hook.line_event(event.file.as_deref(), event.line);
        delivered += 1;
    }
    delivered
}

/// Profile a recorded trace
pub fn profile_trace(
    selector: Selector,
    events: &[TraceEvent],
    config: ProfilerConfig,
) -> Result<LineReport> {
    let clock = ManualClock::new(0);
    let mut profiler = Profiler::with_config(clock.clone(), config);

    tracing::debug!(
        line_slack = profiler.config().line_slack,
        events = events.len(),
        "profiling trace"
    );

    let report = profiler.profile_with(selector, |hook: &mut dyn LineHook| {
        let delivered = replay(events, &clock, hook);
        tracing::debug!(delivered, "trace replayed");
        Ok::<_, anyhow::Error>(delivered)
    })?;

    Ok(report)
}
