//! DBC Diff CLI Application
//!
//! This is the command-line interface for the DBC snapshot diff.
//! It uses the dbc-diff library and adds:
//! - Configuration file and command-line overrides
//! - Report generation (TXT/HTML/JSON)
//! - Baseline update after each run
//! - Signal catalog export (`--export-catalog`)

use anyhow::{Context, Result};
use clap::Parser;
use dbc_diff::{BatchRequest, DbcLoader, DiffEngine};
use std::path::PathBuf;

mod baseline;
mod catalog;
mod config;
mod report;

use config::{AppConfig, OutputFormat};

/// DBC Diff - Compare DBC files against their previous snapshots
#[derive(Parser, Debug)]
#[command(name = "dbc-diff")]
#[command(about = "Compare DBC files against a baseline and generate a diff report", long_about = None)]
#[command(version)]
struct Args {
    /// Directory with the current DBC files [default: .]
    #[arg(long, value_name = "DIR")]
    current: Option<PathBuf>,

    /// Directory with the previous DBC files [default: ./old]
    #[arg(long, value_name = "DIR")]
    baseline: Option<PathBuf>,

    /// Directory the report is written to [default: ./reports]
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Report format [default: html]
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Do not report a message whose signals were only reordered
    #[arg(long)]
    ignore_signal_order: bool,

    /// Leave a field out of the comparison (can be repeated); prefix with
    /// `message.` or `signal.` to target one entity
    #[arg(long = "ignore-field", value_name = "FIELD")]
    ignore_fields: Vec<String>,

    /// Do not copy compared files into the baseline directory
    #[arg(long)]
    no_update_baseline: bool,

    /// Export the signal catalog of the current directory instead of diffing
    #[arg(long)]
    export_catalog: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("DBC Diff CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using diff library v{}", dbc_diff::VERSION);

    let config = resolve_config(&args)?;
    log::debug!("Effective configuration: {:?}", config);

    if args.export_catalog {
        export_catalog(&config)
    } else {
        run(&config)
    }
}

/// Merge defaults, the configuration file and command-line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(dir) = &args.current {
        config.input.current_dir = dir.clone();
    }
    if let Some(dir) = &args.baseline {
        config.input.baseline_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output.output_dir = dir.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if args.ignore_signal_order {
        config.diff.ignore_signal_order = true;
    }
    config.diff.ignored_fields.extend(args.ignore_fields.iter().cloned());
    if args.no_update_baseline {
        config.baseline.update = false;
    }

    config.diff.validate()?;
    Ok(config)
}

/// Compare, report, then roll the baseline forward
fn run(config: &AppConfig) -> Result<()> {
    let request = BatchRequest::new(&config.input.current_dir, &config.input.baseline_dir)
        .with_extension(config.input.extension.as_str());
    let engine = DiffEngine::new(config.diff.clone());

    let report = dbc_diff::compare_directories(&request, &DbcLoader, &engine)
        .with_context(|| format!("Failed to scan {:?}", request.current_dir))?;

    for file in &report.files {
        println!("[OK] Processed {}", file.file_name);
    }
    for failure in &report.failures {
        println!("[FAILED] {}: {}", failure.file_name, failure.reason);
    }

    let path = report::write_report(&report, config.output.format, &config.output.output_dir)?;

    if config.baseline.update {
        baseline::update_baseline(&report, &request.current_dir, &request.baseline_dir)?;
    } else {
        log::info!("Baseline update disabled");
    }

    println!("\n[DONE] Report generated: {}", path.display());
    Ok(())
}

/// Write the signal catalog of every current file
fn export_catalog(config: &AppConfig) -> Result<()> {
    let catalog = dbc_diff::load_catalog(&config.input.current_dir, &config.input.extension, &DbcLoader)
        .with_context(|| format!("Failed to scan {:?}", config.input.current_dir))?;

    for entry in &catalog.files {
        println!("[OK] Exported {}", entry.file_name);
    }
    for failure in &catalog.failures {
        println!("[FAILED] {}: {}", failure.file_name, failure.reason);
    }

    let path = catalog::write_catalog(&catalog, config.output.format, &config.output.output_dir)?;
    println!("\n[DONE] Catalog generated: {}", path.display());
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
