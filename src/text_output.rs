//! Human-readable output for line reports
//!
//! Two views:
//! - summary (default): per-file totals and the slowest lines
//! - annotated source (`--annotate`): every source line prefixed by its time

use crate::report::{non_zero_lines, LineReport};
use std::fs;
use std::path::Path;

/// Format microseconds as milliseconds for display
pub fn format_ms(micros: u64) -> String {
    format!("{:.1}ms", micros as f64 / 1000.0)
}

/// Render the summary view
pub fn render_summary(report: &LineReport, top: usize) -> String {
    let mut out = String::new();

    if report.is_empty() {
        out.push_str("No line profiling data collected.\n");
        return out;
    }

    for (file, lines) in report.sorted_files() {
        let total: u64 = lines.iter().sum();
        out.push_str(&format!("{} ({} total)\n", file, format_ms(total)));

        let mut hot: Vec<_> = non_zero_lines(file, lines).collect();
        if hot.is_empty() {
            out.push_str("  (no time recorded)\n");
            continue;
        }
        hot.sort_by(|a, b| b.micros.cmp(&a.micros).then_with(|| a.line.cmp(&b.line)));

        out.push_str(&format!("  {:>6}  {:>10}  {:>6}\n", "Line", "Time", "%"));
        for timing in hot.iter().take(top) {
            let percent = timing.micros as f64 / total as f64 * 100.0;
            out.push_str(&format!(
                "  {:>6}  {:>10}  {:>5.1}%\n",
                timing.line,
                format_ms(timing.micros),
                percent
            ));
        }
        if hot.len() > top {
            out.push_str(&format!("  ... {} more lines\n", hot.len() - top));
        }
    }

    out.push_str(&"─".repeat(32));
    out.push('\n');
    out.push_str(&format!("Total: {}\n", format_ms(report.total_micros())));
    out
}

/// Render every profiled file as annotated source
///
/// Files whose source can't be read fall back to a listing of the lines that
/// received time.
pub fn render_annotated(report: &LineReport) -> String {
    let mut out = String::new();

    for (file, lines) in report.sorted_files() {
        out.push_str(&format!("== {} ==\n", file));
        match fs::read_to_string(Path::new(file)) {
            Ok(source) => annotate_source(&mut out, &source, lines),
            Err(err) => {
                tracing::warn!(file, %err, "source unavailable, listing timed lines only");
                for timing in non_zero_lines(file, lines) {
                    out.push_str(&format!("{:>10} | {:>5} |\n", format_ms(timing.micros), timing.line));
                }
            }
        }
    }

    out
}

fn annotate_source(out: &mut String, source: &str, lines: &[u64]) {
    for (index, text) in source.lines().enumerate() {
        let line = index + 1;
        let micros = lines.get(line).copied().unwrap_or(0);
        let time = if micros > 0 {
            format_ms(micros)
        } else {
            String::new()
        };
        out.push_str(&format!("{:>10} | {:>5} | {}\n", time, line, text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn report(entries: Vec<(String, Vec<u64>)>) -> LineReport {
        LineReport::from(entries.into_iter().collect::<HashMap<_, _>>())
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(0), "0.0ms");
        assert_eq!(format_ms(1500), "1.5ms");
        assert_eq!(format_ms(2_000_000), "2000.0ms");
    }

    #[test]
    fn test_summary_empty_report() {
        let text = render_summary(&LineReport::default(), 10);
        assert!(text.contains("No line profiling data collected."));
    }

    #[test]
    fn test_summary_orders_lines_by_time() {
        let report = report(vec![("a.rb".to_string(), vec![0, 1000, 5000, 0, 2000])]);
        let text = render_summary(&report, 10);

        let line2 = text.find("     2").unwrap();
        let line4 = text.find("     4").unwrap();
        let line1 = text.find("     1 ").unwrap();
        assert!(line2 < line4 && line4 < line1);
        assert!(text.contains("a.rb (8.0ms total)"));
        assert!(text.contains("Total: 8.0ms"));
    }

    #[test]
    fn test_summary_truncates_to_top() {
        let report = report(vec![("a.rb".to_string(), vec![0, 1, 2, 3, 4])]);
        let text = render_summary(&report, 2);
        assert!(text.contains("... 2 more lines"));
    }

    #[test]
    fn test_summary_file_without_time() {
        let report = report(vec![("idle.rb".to_string(), vec![])]);
        let text = render_summary(&report, 10);
        assert!(text.contains("idle.rb (0.0ms total)"));
        assert!(text.contains("(no time recorded)"));
    }

    #[test]
    fn test_annotated_reads_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.rb");
        fs::write(&path, "x = 1\nsleep 0.1\nputs x\n").unwrap();
        let file = path.to_string_lossy().into_owned();

        let report = report(vec![(file.clone(), vec![0, 0, 100_000, 0])]);
        let text = render_annotated(&report);

        assert!(text.contains(&format!("== {} ==", file)));
        assert!(text.contains("100.0ms |     2 | sleep 0.1"));
        assert!(text.contains("           |     1 | x = 1"));
        assert!(text.contains("|     3 | puts x"));
    }

    #[test]
    fn test_annotated_falls_back_without_source() {
        let report = report(vec![(
            "/nonexistent/lineprof/a.rb".to_string(),
            vec![0, 0, 0, 2500],
        )]);
        let text = render_annotated(&report);

        assert!(text.contains("2.5ms |     3 |"));
        assert!(!text.contains("|     1 |"));
    }
}
