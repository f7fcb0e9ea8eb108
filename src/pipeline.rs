//! Pipeline functions for programmatic use by the CLI.
//!
//! A run is read, parse, index, assemble, render, write. The page is fully
//! rendered before the output file is created, so a failing run leaves no
//! output behind.

use crate::activity::Activity;
use crate::aggregate::ActivityIndex;
use crate::error::StatsError;
use crate::html::render_report;
use crate::parser::{parse_records, ColumnLayout};
use crate::report::{assemble_report, ReportConfig};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::path::{Path, PathBuf};

/// Output path used when none is given.
pub const DEFAULT_OUTPUT: &str = "stats.htm";

// ============================================================================
// Input
// ============================================================================

/// Fail with [`StatsError::InputNotFound`] unless `path` is an existing regular file.
pub fn check_input(path: &Path) -> Result<(), StatsError> {
    if path.is_file() {
        Ok(())
    } else {
        let shown = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Err(StatsError::InputNotFound(shown))
    }
}

/// Read all data rows of a CSV file. The header row is skipped unchecked.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context("Failed to open input CSV")?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV row")?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    Ok(rows)
}

/// Read and parse every activity in `path`.
pub fn read_activities(path: &Path, layout: ColumnLayout) -> Result<Vec<Activity>> {
    let rows = read_rows(path)?;
    let activities = parse_records(&rows, layout)?;
    log::info!("Parsed {} activities from {}", activities.len(), path.display());
    Ok(activities)
}

// ============================================================================
// Stats page
// ============================================================================

/// Configuration for one stats page run.
#[derive(Debug, Clone)]
pub struct StatsPageConfig {
    /// Elevate CSV export
    pub input: PathBuf,
    /// HTML file to write
    pub output: PathBuf,
    pub report: ReportConfig,
}

impl StatsPageConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            report: ReportConfig::default(),
        }
    }
}

/// Render the HTML page for an already parsed activity list.
pub fn generate_stats_page(activities: &[Activity], config: &ReportConfig) -> String {
    let index = ActivityIndex::new(activities);
    let report = assemble_report(&index, config);
    log::debug!("Assembled {} sections", report.sections.len());
    render_report(&report).into_string()
}

/// Read the export, build the report and write it to `config.output`.
///
/// Returns a summary string on success.
pub fn write_stats_page(config: &StatsPageConfig) -> Result<String> {
    check_input(&config.input)?;
    let activities = read_activities(&config.input, config.report.layout)?;
    let page = generate_stats_page(&activities, &config.report);

    std::fs::write(&config.output, page)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    log::info!("Wrote {}", config.output.display());

    Ok(format!(
        "Wrote {} ({} activities)",
        config.output.display(),
        activities.len()
    ))
}
