//! Loaders for reading record data from files.
//!
//! Snapshots are RON documents of [`StateNode`](record_core::StateNode)s;
//! synchronization settings are TOML.

pub mod config;
pub mod snapshot;

pub use config::ConfigLoader;
pub use snapshot::{SnapshotFile, SnapshotLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    tracing::debug!(path = %path.display(), "reading record data file");
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
