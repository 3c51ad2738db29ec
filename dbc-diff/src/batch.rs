//! Directory-level batch comparison
//!
//! Compares every definition file of a current directory against the file of
//! the same name in a baseline directory. Files are independent, so they are
//! compared in parallel; each one yields either a diff or a failure and a
//! failing file never stops the others.

use crate::engine::DiffEngine;
use crate::model::{ModelLoader, ModelStats};
use crate::result::DiffResult;
use crate::types::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Default extension of network definition files
pub const DEFAULT_EXTENSION: &str = "dbc";

/// Directories and file filter for one batch run
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Directory holding the current snapshots
    pub current_dir: PathBuf,
    /// Directory holding the previous snapshots
    pub baseline_dir: PathBuf,
    /// File extension to pick up, compared case-insensitively
    pub extension: String,
}

impl BatchRequest {
    pub fn new(current_dir: impl Into<PathBuf>, baseline_dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: current_dir.into(),
            baseline_dir: baseline_dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Builder method: set the file extension
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

/// Successful comparison of one file
#[derive(Debug, Clone, Serialize)]
pub struct FileDiff {
    pub file_name: String,
    /// Statistics of the new snapshot
    pub stats: ModelStats,
    pub result: DiffResult,
    /// Why the baseline file could not be loaded, if it exists but is
    /// unreadable. The file is then compared as having no prior snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_error: Option<String>,
}

/// A file that could not be compared
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub file_name: String,
    pub reason: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Files present now but not in the baseline
    pub added_files: Vec<String>,
    /// Files present in the baseline but not now
    pub removed_files: Vec<String>,
    /// Successful comparisons, ordered by file name
    pub files: Vec<FileDiff>,
    /// Failed comparisons, ordered by file name
    pub failures: Vec<FileFailure>,
}

/// Compare a current directory against its baseline directory
///
/// A missing baseline directory means no file has a prior snapshot. Listing
/// the current directory is the only error that aborts the run.
pub fn compare_directories<L: ModelLoader>(
    request: &BatchRequest,
    loader: &L,
    engine: &DiffEngine,
) -> Result<BatchReport> {
    let current = list_definition_files(&request.current_dir, &request.extension)?;
    let baseline = if request.baseline_dir.is_dir() {
        list_definition_files(&request.baseline_dir, &request.extension)?
    } else {
        log::info!("Baseline directory {:?} not found, treating all files as new", request.baseline_dir);
        BTreeSet::new()
    };

    let added_files: Vec<String> = current.difference(&baseline).cloned().collect();
    let removed_files: Vec<String> = baseline.difference(&current).cloned().collect();

    log::info!(
        "Comparing {} file(s): {} added, {} removed",
        current.len(),
        added_files.len(),
        removed_files.len()
    );

    let outcomes: Vec<std::result::Result<FileDiff, FileFailure>> = current
        .par_iter()
        .map(|file_name| compare_file(request, file_name, loader, engine))
        .collect();

    let mut files = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(diff) => files.push(diff),
            Err(failure) => failures.push(failure),
        }
    }

    Ok(BatchReport {
        added_files,
        removed_files,
        files,
        failures,
    })
}

/// Compare one file of the batch
fn compare_file<L: ModelLoader>(
    request: &BatchRequest,
    file_name: &str,
    loader: &L,
    engine: &DiffEngine,
) -> std::result::Result<FileDiff, FileFailure> {
    let fail = |reason: String| {
        log::warn!("Skipping {}: {}", file_name, reason);
        FileFailure {
            file_name: file_name.to_string(),
            reason,
        }
    };

    let new_model = loader
        .load(&request.current_dir.join(file_name))
        .map_err(|e| fail(e.to_string()))?;

    let old_path = request.baseline_dir.join(file_name);
    let mut baseline_error = None;
    let old_model = if old_path.is_file() {
        match loader.load(&old_path) {
            Ok(model) => Some(model),
            Err(e) => {
                log::warn!("Unreadable baseline for {}, comparing as new: {}", file_name, e);
                baseline_error = Some(e.to_string());
                None
            }
        }
    } else {
        None
    };

    let result = engine
        .compare(old_model.as_ref(), &new_model)
        .map_err(|e| fail(e.to_string()))?;

    log::info!("Processed {}", file_name);

    Ok(FileDiff {
        file_name: file_name.to_string(),
        stats: new_model.stats(),
        result,
        baseline_error,
    })
}

/// List file names in `dir` with the given extension, sorted
pub fn list_definition_files(dir: &Path, extension: &str) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case(extension));
        if !matches {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => {
                names.insert(name);
            }
            Err(name) => log::warn!("Ignoring non UTF-8 file name {:?}", name),
        }
    }
    Ok(names)
}
