use anyhow::{Context, Result};
use clap::Parser;
use lineprof::cli::{Cli, Command, OutputFormat, ReplayArgs};
use lineprof::{
    csv_output::CsvOutput, json_output::JsonOutput, replay, text_output, PathResolution,
    ProfilerConfig, Selector,
};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Merge the config file (if any) with command-line overrides
fn load_config(args: &ReplayArgs) -> Result<ProfilerConfig> {
    let mut config = match &args.config {
        Some(path) => ProfilerConfig::from_toml(path)?,
        None => ProfilerConfig::default(),
    };

    if let Some(top) = args.top {
        config.top = top;
    }
    if args.canonicalize {
        config.path_resolution = PathResolution::Canonical;
    }

    Ok(config)
}

fn run_replay(args: ReplayArgs) -> Result<()> {
    let config = load_config(&args)?;
    let selector = Selector::parse(&args.select)
        .with_context(|| format!("Invalid selector: {}", args.select))?;
    let selector_text = selector.to_string();
    let top = config.top;

    let events = replay::read_trace(&args.trace)?;
    tracing::debug!(events = events.len(), selector = %selector_text, "replaying trace");
    let report = replay::profile_trace(selector, &events, config)?;

    match args.format {
        OutputFormat::Text if args.annotate => print!("{}", text_output::render_annotated(&report)),
        OutputFormat::Text => print!("{}", text_output::render_summary(&report, top)),
        OutputFormat::Json => {
            let mut output = JsonOutput::new(selector_text, &report, top);
            output.set_event_count(events.len() as u64);
            println!("{}", output.to_json()?);
        }
        OutputFormat::Csv => print!("{}", CsvOutput::new(&report).to_csv()),
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    match args.command {
        Command::Replay(replay_args) => run_replay(replay_args),
    }
}
