//! CSV output format for line reports
//!
//! `--format csv`: one row per line with attributed time, for spreadsheet
//! analysis and machine parsing. Zero-time lines and slack slots are omitted.

use crate::report::{non_zero_lines, LineReport};

/// CSV output formatter
#[derive(Debug)]
pub struct CsvOutput<'a> {
    report: &'a LineReport,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter
    pub fn new(report: &'a LineReport) -> Self {
        Self { report }
    }

    /// CSV header row
    fn header() -> &'static str {
        "file,line,time_us"
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        // If field contains comma, quote, or newline, wrap in quotes and escape quotes
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Generate CSV output as string
    ///
    /// Files are sorted by path, lines by line number.
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(Self::header());
        output.push('\n');

        for (file, lines) in self.report.sorted_files() {
            let file = Self::escape_field(file);
            for timing in non_zero_lines("", lines) {
                output.push_str(&format!("{},{},{}\n", file, timing.line, timing.micros));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn report(entries: &[(&str, Vec<u64>)]) -> LineReport {
        let files: HashMap<String, Vec<u64>> = entries
            .iter()
            .map(|(file, lines)| (file.to_string(), lines.clone()))
            .collect();
        LineReport::from(files)
    }

    #[test]
    fn test_csv_header_only_for_empty_report() {
        let report = LineReport::default();
        assert_eq!(CsvOutput::new(&report).to_csv(), "file,line,time_us\n");
    }

    #[test]
    fn test_csv_rows_skip_zero_lines() {
        let report = report(&[("a.rb", vec![0, 5, 0, 7, 0, 0])]);
        assert_eq!(
            CsvOutput::new(&report).to_csv(),
            "file,line,time_us\na.rb,1,5\na.rb,3,7\n"
        );
    }

    #[test]
    fn test_csv_files_sorted() {
        let report = report(&[("z.rb", vec![0, 1]), ("m.rb", vec![0, 2])]);
        let csv = CsvOutput::new(&report).to_csv();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[1], "m.rb,1,2");
        assert_eq!(lines[2], "z.rb,1,1");
    }

    #[test]
    fn test_csv_escape_comma_in_path() {
        let report = report(&[("dir,with,commas/a.rb", vec![0, 1])]);
        let csv = CsvOutput::new(&report).to_csv();
        assert!(csv.contains("\"dir,with,commas/a.rb\",1,1"));
    }

    #[test]
    fn test_csv_escape_quotes() {
        assert_eq!(
            CsvOutput::escape_field("say \"hi\".rb"),
            "\"say \"\"hi\"\".rb\""
        );
        assert_eq!(CsvOutput::escape_field("plain.rb"), "plain.rb");
    }
}
