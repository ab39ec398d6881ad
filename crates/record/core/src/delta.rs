//! Field-level change sets between two versions of a record.
//!
//! A [`RecordDelta`] holds only the synchronized fields that changed, in
//! declaration order, encoded exactly as `write_state` would encode them.
//! Because `read_state` leaves absent fields untouched, applying a delta is
//! just reading it into the older record.

use tracing::debug;

use crate::error::Result;
use crate::node::StateNode;
use crate::record::SyncRecord;

/// Changed synchronized fields of one record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordDelta {
    changes: StateNode,
}

impl RecordDelta {
    /// Compares every synchronized field of `before` and `after`.
    ///
    /// Block fields that changed are carried whole, so the receiver's reset
    /// on read drops entries that went back to default.
    pub fn between<R: SyncRecord>(before: &R, after: &R) -> Self {
        let registry = R::registry();
        let mut changes = StateNode::new();
        for field in registry.changed(before, after) {
            field.write(after, &mut changes);
        }

        debug!(
            record = registry.record_name(),
            changed = changes.len(),
            fields = registry.len(),
            "computed record delta"
        );

        Self { changes }
    }

    /// Returns true if no synchronized field changed.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Names of the changed fields: scalars first, then blocks.
    pub fn changed_fields(&self) -> Vec<&str> {
        self.changes
            .values()
            .map(|(name, _)| name)
            .chain(self.changes.block_names())
            .collect()
    }

    /// The encoded changes.
    pub fn changes(&self) -> &StateNode {
        &self.changes
    }

    /// Replays the changes onto `record`; applied to `before` it yields `after`.
    pub fn apply<R: SyncRecord>(&self, record: &mut R) -> Result<()> {
        record.read_state(&self.changes)
    }
}
