//! Record snapshot loader.
//!
//! A snapshot file names the record type it holds and stores each record as
//! the node its `write_state` produced:
//!
//! ```text
//! (
//!     record: "account",
//!     entries: [
//!         (values: [("Id", Id((kind: "account", raw: 1))), ("Name", String("ada"))], blocks: []),
//!     ],
//! )
//! ```

use std::path::Path;

use anyhow::Context;
use record_core::{StateNode, SyncConfig, SyncRecord};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// On-disk snapshot of records of one type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub record: String,
    pub entries: Vec<StateNode>,
}

impl SnapshotFile {
    /// Snapshot of `records`, each written in declaration order.
    pub fn capture<R: SyncRecord>(records: &[R]) -> Self {
        Self {
            record: R::registry().record_name().to_owned(),
            entries: records.iter().map(R::snapshot).collect(),
        }
    }

    /// Reads every entry into a fresh `R`.
    ///
    /// Fails if the snapshot holds another record type or an entry carries a
    /// value of the wrong kind for a known field.
    pub fn restore<R: SyncRecord>(&self, config: &SyncConfig) -> LoadResult<Vec<R>> {
        let expected = R::registry().record_name();
        anyhow::ensure!(
            self.record == expected,
            "Snapshot holds `{}` records, expected `{}`",
            self.record,
            expected
        );

        self.entries
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let mut record = R::default();
                record
                    .read_state_with(node, config)
                    .with_context(|| format!("Failed to read `{expected}` entry {index}"))?;
                Ok(record)
            })
            .collect()
    }
}

/// Loader for record snapshots from RON files.
pub struct SnapshotLoader;

impl SnapshotLoader {
    /// Load a snapshot file without interpreting its entries.
    pub fn load_file(path: &Path) -> LoadResult<SnapshotFile> {
        let content = read_file(path)?;
        ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse snapshot RON: {}", e))
    }

    /// Load the records of one type from a RON snapshot.
    pub fn load<R: SyncRecord>(path: &Path) -> LoadResult<Vec<R>> {
        Self::load_with(path, &SyncConfig::default())
    }

    pub fn load_with<R: SyncRecord>(path: &Path, config: &SyncConfig) -> LoadResult<Vec<R>> {
        let records = Self::load_file(path)?.restore(config)?;
        tracing::debug!(path = %path.display(), count = records.len(), "loaded record snapshot");
        Ok(records)
    }

    /// Write `records` to `path` as a pretty-printed RON snapshot.
    pub fn save<R: SyncRecord>(path: &Path, records: &[R]) -> LoadResult<()> {
        let file = SnapshotFile::capture(records);
        let content = ron::ser::to_string_pretty(&file, ron::ser::PrettyConfig::default())
            .map_err(|e| anyhow::anyhow!("Failed to serialize snapshot RON: {}", e))?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write file {}", path.display()))?;

        tracing::debug!(path = %path.display(), count = records.len(), "saved record snapshot");
        Ok(())
    }
}
