//! Elevate Stats - HTML activity statistics from an Elevate CSV export
//!
//! Reads the export, then writes yearly distance, elevation and duration
//! aggregates plus top-10 leaderboards to a single HTML page.
//!
//! Usage: elevate-stats [--output stats.htm] [--variant full] <export.csv>

use anyhow::Result;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Parser, ValueEnum};
use elevate_stats::error::StatsError;
use elevate_stats::pipeline::{write_stats_page, StatsPageConfig, DEFAULT_OUTPUT};
use elevate_stats::report::{ReportConfig, ReportVariant, DEFAULT_TOP_N};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "elevate-stats", version)]
#[command(about = "Generate an HTML activity stats page from an Elevate CSV export")]
struct Cli {
    /// CSV file exported from Elevate
    input: PathBuf,

    /// HTML file to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Report flavour, matching the columns of the export
    #[arg(long, value_enum, default_value_t = VariantOpt::Full)]
    variant: VariantOpt,

    /// Number of activities per leaderboard table
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum VariantOpt {
    /// Started, name, type, duration, distance, elevation
    Full,
    /// Started, type, duration, distance, elevation
    Anonymous,
    /// Aggregate tables only
    Totals,
}

impl From<VariantOpt> for ReportVariant {
    fn from(value: VariantOpt) -> Self {
        match value {
            VariantOpt::Full => ReportVariant::Full,
            VariantOpt::Anonymous => ReportVariant::Anonymous,
            VariantOpt::Totals => ReportVariant::Totals,
        }
    }
}

/// A missing or surplus positional argument, as opposed to a bad option.
fn is_arity_error(e: &clap::Error) -> bool {
    match e.kind() {
        ErrorKind::MissingRequiredArgument => true,
        ErrorKind::UnknownArgument => !matches!(
            e.get(ContextKind::InvalidArg),
            Some(ContextValue::String(arg)) if arg.starts_with('-')
        ),
        _ => false,
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            if is_arity_error(&e) {
                eprintln!("{}", StatsError::InvalidArguments);
            }
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let config = StatsPageConfig {
        input: cli.input,
        output: cli.output,
        report: ReportConfig::for_variant(cli.variant.into()).with_top_n(cli.top_n),
    };

    let summary = write_stats_page(&config)?;
    println!("{}", summary);

    Ok(())
}
