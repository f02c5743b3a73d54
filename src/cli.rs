//! CLI argument parsing for lineprof

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for line reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "lineprof")]
#[command(version)]
#[command(about = "Line-level wall-clock profiler for interpreter line-event traces", long_about = None)]
pub struct Cli {
    /// Enable debug logging to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Profile a recorded JSON Lines trace of line events
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Trace file to replay (`-` for stdin)
    #[arg(value_name = "TRACE")]
    pub trace: PathBuf,

    /// Files to profile: an exact path, or /regex/ for a pattern
    #[arg(short = 's', long = "select", value_name = "SELECTOR")]
    pub select: String,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Lines shown per file (overrides the config file)
    #[arg(long = "top", value_name = "N")]
    pub top: Option<usize>,

    /// Print annotated source instead of the summary (text format only)
    #[arg(short = 'a', long = "annotate")]
    pub annotate: bool,

    /// Resolve the selected path through the filesystem before matching
    #[arg(long = "canonicalize")]
    pub canonicalize: bool,

    /// Profiler configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay_args(cli: Cli) -> ReplayArgs {
        match cli.command {
            Command::Replay(args) => args,
        }
    }

    #[test]
    fn test_cli_parses_replay() {
        let cli = Cli::parse_from(["lineprof", "replay", "trace.jsonl", "-s", "a.rb"]);
        assert!(!cli.debug);
        let args = replay_args(cli);
        assert_eq!(args.trace, PathBuf::from("trace.jsonl"));
        assert_eq!(args.select, "a.rb");
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.top.is_none());
        assert!(!args.annotate);
    }

    #[test]
    fn test_cli_requires_selector() {
        assert!(Cli::try_parse_from(["lineprof", "replay", "trace.jsonl"]).is_err());
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["lineprof"]).is_err());
    }

    #[test]
    fn test_cli_format_json() {
        let cli = Cli::parse_from([
            "lineprof", "replay", "-", "--select", "/app/", "--format", "json",
        ]);
        let args = replay_args(cli);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.select, "/app/");
    }

    #[test]
    fn test_cli_debug_is_global() {
        let cli = Cli::parse_from(["lineprof", "replay", "t", "-s", "a.rb", "--debug"]);
        assert!(cli.debug);
    }

    #[test]
    fn test_cli_top_and_annotate() {
        let cli = Cli::parse_from([
            "lineprof", "replay", "t", "-s", "a.rb", "--top", "3", "-a", "--canonicalize",
        ]);
        let args = replay_args(cli);
        assert_eq!(args.top, Some(3));
        assert!(args.annotate);
        assert!(args.canonicalize);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from([
            "lineprof", "replay", "t", "-s", "a.rb", "--format", "xml"
        ])
        .is_err());
    }
}
