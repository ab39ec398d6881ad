//! Record payloads built on the `record-core` synchronization contract.
//!
//! This crate houses the concrete persisted records and loaders for their data files:
//! - Identifier newtypes (accounts, characters, items)
//! - Stat enumerations used as dense map keys
//! - Records: accounts, character stats, item stats
//! - Snapshot files (RON) and synchronization settings (TOML)

pub mod ids;
pub mod records;
pub mod stats;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use ids::{AccountId, CharacterId, ItemId};
pub use records::{Account, CharacterStats, ItemStats};
pub use stats::{ItemStatKind, StatKind};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, SnapshotFile, SnapshotLoader};
