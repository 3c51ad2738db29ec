//! Network definition model and loaders
//!
//! This module contains the in-memory snapshot model and the DBC loader
//! that produces it.

pub mod database;
pub mod dbc;

use crate::types::Result;
use std::path::Path;

// Re-export key types for convenience
pub use database::{ByteOrder, Message, Model, ModelStats, Node, Signal};
pub use dbc::DbcLoader;

/// Turns a network definition file into a [`Model`]
///
/// Implementations must fail with [`DiffError::LoadError`](crate::DiffError::LoadError)
/// when the file cannot be read or parsed.
pub trait ModelLoader: Sync {
    fn load(&self, path: &Path) -> Result<Model>;
}
