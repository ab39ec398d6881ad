//! Synchronization settings loader.

use std::path::Path;

use record_core::SyncConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`SyncConfig`] from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys left out of the file keep their defaults.
    pub fn load(path: &Path) -> LoadResult<SyncConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SyncConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}
