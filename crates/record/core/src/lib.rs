//! State synchronization contract shared by every persisted record type.
//!
//! `record-core` defines how a record exposes its synchronized fields to
//! generic infrastructure that cannot know field names at compile time:
//!
//! - [`SyncRecord`] drives named, order-independent state reads and
//!   declaration-ordered state writes through a per-type [`FieldRegistry`].
//! - [`Value`] is the closed set of column value kinds passed through the
//!   by-name accessors (`get_value` / `set_value`).
//! - [`EnumMap`] is a dense, enum-keyed value vector with sparse persistence,
//!   used for stat-style columns keyed by a bounded enumeration.
//! - [`ColumnCatalog`] carries static column metadata for database binders.
//!
//! Record payloads (accounts, characters, items) live in `record-content`;
//! the reader/writer used to move state around is any [`StateReader`] /
//! [`StateWriter`], with [`StateNode`] as the in-memory document.
pub mod column;
pub mod config;
pub mod delta;
pub mod dense;
pub mod error;
pub mod node;
pub mod record;
pub mod registry;
pub mod stream;
pub mod value;

pub use column::{ColumnCatalog, ColumnMetadata, ColumnSchema};
pub use config::{SyncConfig, UnknownFieldPolicy};
pub use delta::RecordDelta;
pub use dense::{DenseValue, EnumKey, EnumMap, IndexTable};
pub use error::{RecordError, Result};
pub use node::StateNode;
pub use record::SyncRecord;
pub use registry::{FieldDescriptor, FieldRegistry, RegistryBuilder, StateBlock};
pub use stream::{StateReader, StateReaderExt, StateWriter, StateWriterExt};
pub use value::{FieldKind, FieldValue, IdValue, Identifier, Value, ValueError, ValueKind};
