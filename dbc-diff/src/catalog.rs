//! Signal catalog of a definition directory
//!
//! Loads every definition file of a directory without comparing anything,
//! for exporting the full message and signal layout of each file.

use crate::batch::{list_definition_files, FileFailure};
use crate::model::{Model, ModelLoader};
use crate::types::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

/// One loaded definition file
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub file_name: String,
    pub model: Model,
}

/// All files of a directory, loaded or failed
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    /// Loaded files, ordered by file name
    pub files: Vec<CatalogEntry>,
    /// Files that could not be loaded, ordered by file name
    pub failures: Vec<FileFailure>,
}

impl Catalog {
    /// Total number of signals over all loaded files
    pub fn num_signals(&self) -> usize {
        self.files.iter().map(|f| f.model.stats().num_signals).sum()
    }
}

/// Load every file with the given extension in `dir`
///
/// A file that fails to load is recorded and skipped. Only listing the
/// directory can fail the whole call.
pub fn load_catalog<L: ModelLoader>(dir: &Path, extension: &str, loader: &L) -> Result<Catalog> {
    let names = list_definition_files(dir, extension)?;
    log::info!("Loading {} file(s) from {:?}", names.len(), dir);

    let outcomes: Vec<std::result::Result<CatalogEntry, FileFailure>> = names
        .par_iter()
        .map(|file_name| match loader.load(&dir.join(file_name)) {
            Ok(model) => Ok(CatalogEntry {
                file_name: file_name.clone(),
                model,
            }),
            Err(e) => {
                log::warn!("Skipping {}: {}", file_name, e);
                Err(FileFailure {
                    file_name: file_name.clone(),
                    reason: e.to_string(),
                })
            }
        })
        .collect();

    let mut catalog = Catalog::default();
    for outcome in outcomes {
        match outcome {
            Ok(entry) => catalog.files.push(entry),
            Err(failure) => catalog.failures.push(failure),
        }
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiffError;
    use std::fs;
    use tempfile::TempDir;

    /// Loader that succeeds with an empty model unless the file says "bad"
    struct StubLoader;

    impl ModelLoader for StubLoader {
        fn load(&self, path: &Path) -> Result<Model> {
            if fs::read_to_string(path)?.trim() == "bad" {
                return Err(DiffError::LoadError("bad file".to_string()));
            }
            Ok(Model::new().with_node("ECU1"))
        }
    }

    #[test]
    fn test_load_catalog() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.dbc"), "ok").unwrap();
        fs::write(dir.path().join("a.dbc"), "ok").unwrap();
        fs::write(dir.path().join("c.dbc"), "bad").unwrap();
        fs::write(dir.path().join("readme.md"), "bad").unwrap();

        let catalog = load_catalog(dir.path(), "dbc", &StubLoader).unwrap();

        let names: Vec<&str> = catalog.files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.dbc", "b.dbc"]);
        assert_eq!(catalog.failures.len(), 1);
        assert_eq!(catalog.failures[0].file_name, "c.dbc");
        assert!(catalog.failures[0].reason.contains("bad file"));
        assert_eq!(catalog.num_signals(), 0);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_catalog(&dir.path().join("missing"), "dbc", &StubLoader).is_err());
    }
}
