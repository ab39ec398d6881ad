//! The synchronization contract implemented by every record type.

use crate::config::SyncConfig;
use crate::error::Result;
use crate::node::StateNode;
use crate::registry::FieldRegistry;
use crate::stream::{StateReader, StateWriter};
use crate::value::Value;

/// A record whose synchronized fields are described by a static
/// [`FieldRegistry`].
///
/// Implementors only provide [`registry`](Self::registry), typically backed by
/// a `OnceLock` so the registry is built on first use and shared afterwards:
///
/// ```
/// use std::sync::OnceLock;
/// use record_core::{FieldRegistry, SyncRecord, Value};
///
/// #[derive(Default)]
/// struct Guild {
///     name: String,
///     members: u16,
/// }
///
/// impl SyncRecord for Guild {
///     fn registry() -> &'static FieldRegistry<Self> {
///         static REGISTRY: OnceLock<FieldRegistry<Guild>> = OnceLock::new();
///         REGISTRY.get_or_init(|| {
///             FieldRegistry::builder("guild")
///                 .field("Name", |g: &Guild| g.name.clone(), |g, v| g.name = v)
///                 .field("Members", |g: &Guild| g.members, |g, v| g.members = v)
///                 .build()
///         })
///     }
/// }
///
/// let mut guild = Guild::default();
/// guild.set_value("Members", Value::Int32(12)).unwrap();
/// assert_eq!(guild.members, 12);
/// ```
pub trait SyncRecord: Default + Sized + 'static {
    fn registry() -> &'static FieldRegistry<Self>;

    /// Writes every synchronized field in declaration order.
    fn write_state(&self, writer: &mut dyn StateWriter) {
        Self::registry().write_state(self, writer);
    }

    /// Reads named values by name, in any order.
    ///
    /// Unknown names are skipped and absent fields keep their value. Fails only
    /// when a known field carries a value of an incompatible kind, in which
    /// case no field is assigned.
    fn read_state(&mut self, reader: &dyn StateReader) -> Result<()> {
        self.read_state_with(reader, &SyncConfig::default())
    }

    fn read_state_with(&mut self, reader: &dyn StateReader, config: &SyncConfig) -> Result<()> {
        Self::registry().read_state(self, reader, config)
    }

    /// Reads a scalar column by name.
    fn get_value(&self, name: &str) -> Result<Value> {
        Self::registry().get_value(self, name)
    }

    /// Assigns a scalar column by name, converting `value` to the column kind.
    fn set_value(&mut self, name: &str, value: Value) -> Result<()> {
        Self::registry().set_value(self, name, value)
    }

    /// Fresh instance holding a copy of every synchronized field.
    ///
    /// Fields outside the registry keep their `Default` value.
    fn deep_copy(&self) -> Self {
        let mut copy = Self::default();
        Self::registry().copy_into(self, &mut copy);
        copy
    }

    /// Convenience: the record's state written into a new [`StateNode`].
    fn snapshot(&self) -> StateNode {
        let mut node = StateNode::new();
        self.write_state(&mut node);
        node
    }
}
