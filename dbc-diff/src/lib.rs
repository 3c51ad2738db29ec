//! DBC Snapshot Diff Library
//!
//! Compares successive snapshots of CAN network definitions (DBC files) and
//! reports which messages and signals were added, removed or changed, with
//! field-level before/after values.
//!
//! # Architecture
//!
//! - Loads DBC files into an immutable [`Model`] (nodes, messages, signals)
//! - Indexes each model by frame ID and by (frame ID, signal name)
//! - Compares messages and signals field by field, in a fixed field order
//! - Produces a [`DiffResult`] whose lists are sorted by frame ID and name
//! - Runs whole directories against a baseline directory in parallel
//! - Loads a whole directory as a signal catalog for export
//!
//! The library does NOT:
//! - Render reports
//! - Update the baseline directory
//!
//! Both are in the application layer (dbc-diff-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use dbc_diff::{BatchRequest, DbcLoader, DiffConfig, DiffEngine, ModelLoader};
//! use std::path::Path;
//!
//! // Compare two snapshots of one file
//! let old = DbcLoader.load(Path::new("old/powertrain.dbc")).unwrap();
//! let new = DbcLoader.load(Path::new("powertrain.dbc")).unwrap();
//! let result = dbc_diff::compare(Some(&old), &new).unwrap();
//! for change in &result.signals.changed {
//!     println!("0x{:X} {}: {:?}", change.frame_id, change.signal_name, change.diffs.fields());
//! }
//!
//! // Compare a whole directory against its baseline
//! let engine = DiffEngine::new(DiffConfig::new().with_ignore_signal_order(true));
//! let request = BatchRequest::new(".", "./old");
//! let report = dbc_diff::compare_directories(&request, &DbcLoader, &engine).unwrap();
//! println!("{} files compared, {} failed", report.files.len(), report.failures.len());
//! ```

// Public modules
pub mod batch;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod fields;
pub mod index;
pub mod model;
pub mod result;
pub mod types;

// Re-export main types for convenience
pub use batch::{compare_directories, BatchReport, BatchRequest, FileDiff, FileFailure};
pub use catalog::{load_catalog, Catalog, CatalogEntry};
pub use config::DiffConfig;
pub use engine::{compare, DiffEngine};
pub use fields::{FieldChange, FieldDiffs, FieldValue};
pub use model::{ByteOrder, DbcLoader, Message, Model, ModelLoader, ModelStats, Node, Signal};
pub use result::{
    DiffResult, DiffSummary, MessageChange, MessageDiff, MessageSummary, SignalChange, SignalDiff,
    SignalRef,
};
pub use types::{DiffError, DuplicateKey, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: an empty model has nothing to report
        let result = compare(None, &Model::new()).unwrap();
        assert!(result.is_empty());
        assert!(result.nodes.is_empty());
    }
}
