mod report;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use vizmorph::{Config, VizMorph, WorkbookSource};

const DEFAULT_LOG_FILTER: &str = "vizmorph=info";

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Suggest alternative visualizations for the worksheets of a Tableau workbook.
///
/// Exit codes: 0 on success, 1 when the workbook or configuration cannot be
/// processed, 2 on invalid arguments.
#[derive(Parser, Debug)]
#[command(name = "vizmorph", version)]
struct Args {
    /// Workbook to analyze (`.twb` or `.twbx`).
    workbook: PathBuf,

    /// TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Force ANSI color output.
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable ANSI color output.
    #[arg(long)]
    no_color: bool,

    /// Drop suggestions below this confidence. Overrides the config file.
    #[arg(long, value_name = "FLOAT", value_parser = parse_confidence)]
    min_confidence: Option<f64>,

    /// Keep at most this many suggestions. Overrides the config file.
    #[arg(long, value_name = "N")]
    limit: Option<usize>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry().with(filter).with(tracing_subscriber::fmt::layer().with_writer(io::stderr)).init();
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading configuration {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(min) = args.min_confidence {
        config.ranking.min_confidence = min;
    }
    if let Some(limit) = args.limit {
        config.ranking.max_suggestions = Some(limit);
    }

    let service = VizMorph::new(config);
    let workbook = service
        .parse_workbook(WorkbookSource::Path(args.workbook.clone()))
        .with_context(|| format!("reading workbook {}", args.workbook.display()))?;
    let report = service.generate_suggestions_verbose(&workbook).context("generating suggestions")?;

    match args.format {
        OutputFormat::Text => report::print_run(&workbook, &report, use_color(args)),
        OutputFormat::Json => report::print_json(&workbook, &report).context("writing JSON report")?,
    }
    Ok(())
}

fn use_color(args: &Args) -> bool {
    if args.color {
        true
    } else if args.no_color {
        false
    } else {
        io::stdout().is_terminal()
    }
}

fn parse_confidence(value: &str) -> Result<f64, String> {
    let parsed: f64 = value.parse().map_err(|_| format!("`{value}` is not a number"))?;
    if (0.0..=1.0).contains(&parsed) { Ok(parsed) } else { Err(format!("`{value}` is not within 0.0..=1.0")) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn confidence_must_be_a_probability() {
        assert_eq!(parse_confidence("0.5"), Ok(0.5));
        assert!(parse_confidence("1.5").is_err());
        assert!(parse_confidence("NaN").is_err());
        assert!(parse_confidence("high").is_err());
    }

    #[test]
    fn usage_errors_are_rejected() {
        assert!(Args::try_parse_from(["vizmorph"]).is_err());
        assert!(Args::try_parse_from(["vizmorph", "a.twb", "--color", "--no-color"]).is_err());
        let args = Args::try_parse_from(["vizmorph", "a.twb", "--format", "json", "--limit", "3"]).unwrap();
        assert!(matches!(args.format, OutputFormat::Json));
        assert_eq!(args.limit, Some(3));
    }
}
