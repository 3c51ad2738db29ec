//! Report generation
//!
//! Renders a batch report as TXT, HTML or JSON and writes it to the output
//! directory as `dashboard.<ext>`.

pub mod html;
pub mod txt;

use crate::config::OutputFormat;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use dbc_diff::BatchReport;
use std::fs;
use std::path::{Path, PathBuf};

/// Base name of the generated report file
const REPORT_STEM: &str = "dashboard";

/// Render a batch report in the given format
pub fn render(report: &BatchReport, format: OutputFormat, generated_at: DateTime<Local>) -> Result<String> {
    match format {
        OutputFormat::Txt => Ok(txt::render(report, generated_at)),
        OutputFormat::Html => Ok(html::render(report, generated_at)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
        }
    }
}

/// Render and write a batch report, returning the written path
pub fn write_report(report: &BatchReport, format: OutputFormat, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let content = render(report, format, Local::now())?;
    let path = output_dir.join(format!("{}.{}", REPORT_STEM, format.extension()));
    fs::write(&path, content).with_context(|| format!("Failed to write report: {:?}", path))?;

    log::info!("Report written to {:?}", path);
    Ok(path)
}

/// Join a list of file names, or "None" when empty
fn file_list(files: &[String]) -> String {
    if files.is_empty() {
        "None".to_string()
    } else {
        files.join(", ")
    }
}

/// Render an optional cycle time
fn cycle_time(value: Option<u64>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}
