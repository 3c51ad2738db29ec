//! Baseline store
//!
//! After a run, the compared files become the baseline of the next run.
//! Files that failed to compare are not copied, so their previous baseline
//! stays in place. A baseline that could not be loaded does not fail the
//! file, so it is replaced here like any other.

use anyhow::{Context, Result};
use dbc_diff::BatchReport;
use std::fs;
use std::path::Path;

/// Copy every successfully compared file into the baseline directory
///
/// Returns the number of files copied.
pub fn update_baseline(report: &BatchReport, current_dir: &Path, baseline_dir: &Path) -> Result<usize> {
    fs::create_dir_all(baseline_dir)
        .with_context(|| format!("Failed to create baseline directory: {:?}", baseline_dir))?;

    for file in &report.files {
        let from = current_dir.join(&file.file_name);
        let to = baseline_dir.join(&file.file_name);
        fs::copy(&from, &to).with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;
        log::debug!("Baseline updated: {:?}", to);
    }

    log::info!("Baseline updated with {} file(s) in {:?}", report.files.len(), baseline_dir);
    Ok(report.files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbc_diff::{DiffResult, FileDiff, FileFailure, ModelStats};
    use tempfile::TempDir;

    fn file_diff(name: &str) -> FileDiff {
        FileDiff {
            file_name: name.to_string(),
            stats: ModelStats::default(),
            result: DiffResult::default(),
            baseline_error: None,
        }
    }

    #[test]
    fn test_update_baseline_copies_successful_files_only() {
        let root = TempDir::new().unwrap();
        let current = root.path().join("current");
        let baseline = root.path().join("old");
        fs::create_dir_all(&current).unwrap();
        fs::write(current.join("good.dbc"), "new content").unwrap();
        fs::write(current.join("broken.dbc"), "garbage").unwrap();

        let report = BatchReport {
            files: vec![file_diff("good.dbc")],
            failures: vec![FileFailure {
                file_name: "broken.dbc".to_string(),
                reason: "parse error".to_string(),
            }],
            ..BatchReport::default()
        };

        let copied = update_baseline(&report, &current, &baseline).unwrap();

        assert_eq!(copied, 1);
        assert_eq!(fs::read_to_string(baseline.join("good.dbc")).unwrap(), "new content");
        assert!(!baseline.join("broken.dbc").exists());
    }

    #[test]
    fn test_update_baseline_overwrites_previous_snapshot() {
        let root = TempDir::new().unwrap();
        let current = root.path().to_path_buf();
        let baseline = root.path().join("old");
        fs::create_dir_all(&baseline).unwrap();
        fs::write(current.join("a.dbc"), "v2").unwrap();
        fs::write(baseline.join("a.dbc"), "v1").unwrap();

        let report = BatchReport {
            files: vec![file_diff("a.dbc")],
            ..BatchReport::default()
        };
        update_baseline(&report, &current, &baseline).unwrap();

        assert_eq!(fs::read_to_string(baseline.join("a.dbc")).unwrap(), "v2");
    }

    #[test]
    fn test_update_baseline_replaces_unreadable_snapshot() {
        let root = TempDir::new().unwrap();
        let current = root.path().to_path_buf();
        let baseline = root.path().join("old");
        fs::create_dir_all(&baseline).unwrap();
        fs::write(current.join("x.dbc"), "valid").unwrap();
        fs::write(baseline.join("x.dbc"), "garbage").unwrap();

        let report = BatchReport {
            files: vec![FileDiff {
                baseline_error: Some("Failed to parse DBC".to_string()),
                ..file_diff("x.dbc")
            }],
            ..BatchReport::default()
        };
        update_baseline(&report, &current, &baseline).unwrap();

        assert_eq!(fs::read_to_string(baseline.join("x.dbc")).unwrap(), "valid");
    }
}
