use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use tracing::debug;

use super::table::EnumKey;
use crate::config::SyncConfig;
use crate::error::{RecordError, Result};
use crate::registry::StateBlock;
use crate::stream::{StateReader, StateReaderExt, StateWriter, StateWriterExt};
use crate::value::{FieldKind, FieldValue, Value, ValueError, ValueKind};

/// Numeric payload of an [`EnumMap`]; `Default` is the omitted sparse value.
pub trait DenseValue: FieldValue + Copy + Default + PartialEq + fmt::Debug {}

impl<T: FieldValue + Copy + Default + PartialEq + fmt::Debug> DenseValue for T {}

/// Fixed-capacity map from every member of `K` to a `V`.
///
/// Storage is one value per enum member, laid out by the enum's shared
/// [`IndexTable`](super::IndexTable). Lookups never fail: the key type only
/// admits members.
#[derive(Clone, PartialEq)]
pub struct EnumMap<K: EnumKey, V: DenseValue> {
    values: Box<[V]>,
    _key: PhantomData<K>,
}

impl<K: EnumKey, V: DenseValue> EnumMap<K, V> {
    /// Map with every member at `V::default()`.
    pub fn new() -> Self {
        Self {
            values: vec![V::default(); K::index_table().len()].into_boxed_slice(),
            _key: PhantomData,
        }
    }

    #[inline]
    pub fn get(&self, key: K) -> V {
        self.values[K::index_table().slot(key)]
    }

    #[inline]
    pub fn set(&mut self, key: K, value: V) {
        self.values[K::index_table().slot(key)] = value;
    }

    /// All `(member, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (K, V)> + '_ {
        let table = K::index_table();
        self.values
            .iter()
            .enumerate()
            .map(move |(slot, value)| (table.key(slot), *value))
    }

    /// Pairs whose value differs from `V::default()`.
    pub fn non_default(&self) -> impl Iterator<Item = (K, V)> + '_ {
        self.iter().filter(|(_, value)| *value != V::default())
    }

    pub fn non_default_count(&self) -> usize {
        self.values.iter().filter(|v| **v != V::default()).count()
    }

    /// Number of members; constant for a given `K`.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sets every member back to `V::default()`.
    pub fn reset(&mut self) {
        self.values.fill(V::default());
    }

    /// Writes only the non-default entries as a named block of
    /// `{ key: <member name>, value: <V> }` sub-records.
    pub fn write_sparse(&self, writer: &mut dyn StateWriter, block: &str) {
        let entries: Vec<(K, V)> = self.non_default().collect();
        debug!(
            domain = K::DOMAIN,
            block,
            written = entries.len(),
            omitted = self.len() - entries.len(),
            "writing sparse block"
        );

        writer.write_many_nodes(block, &entries, |node, &(key, value)| {
            node.write(SyncConfig::SPARSE_KEY_FIELD, Value::String(key.name().to_owned()));
            node.write(SyncConfig::SPARSE_VALUE_FIELD, value.into_value());
        });
    }

    /// Resets every member to default, then applies the entries of `block`.
    ///
    /// Members absent from the stream end up at default even if they held a
    /// value before the read.
    pub fn read_sparse(&mut self, reader: &dyn StateReader, block: &str) -> Result<()> {
        let entries = reader.read_many_nodes(block, |node| {
            let key = node
                .read_enum::<K>(SyncConfig::SPARSE_KEY_FIELD)
                .and_then(|key| {
                    key.ok_or_else(|| ValueError::Missing {
                        field: SyncConfig::SPARSE_KEY_FIELD,
                        expected: FieldKind::required(ValueKind::String),
                    })
                })
                .map_err(|source| entry_error::<K>(block, SyncConfig::SPARSE_KEY_FIELD, source))?;
            let value = node
                .read::<V>(SyncConfig::SPARSE_VALUE_FIELD)
                .and_then(|value| {
                    value.ok_or_else(|| ValueError::Missing {
                        field: SyncConfig::SPARSE_VALUE_FIELD,
                        expected: V::field_kind(),
                    })
                })
                .map_err(|source| {
                    entry_error::<K>(block, SyncConfig::SPARSE_VALUE_FIELD, source)
                })?;
            Ok((key, value))
        })?;

        self.reset();
        debug!(domain = K::DOMAIN, block, read = entries.len(), "read sparse block");
        for (key, value) in entries {
            self.set(key, value);
        }
        Ok(())
    }
}

fn entry_error<K: EnumKey>(block: &str, field: &str, source: ValueError) -> RecordError {
    RecordError::kind_mismatch(K::DOMAIN, format!("{block}.{field}"), source)
}

impl<K: EnumKey, V: DenseValue> Default for EnumMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EnumKey, V: DenseValue> fmt::Debug for EnumMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: EnumKey, V: DenseValue> Index<K> for EnumMap<K, V> {
    type Output = V;

    fn index(&self, key: K) -> &V {
        &self.values[K::index_table().slot(key)]
    }
}

impl<K: EnumKey, V: DenseValue> IndexMut<K> for EnumMap<K, V> {
    fn index_mut(&mut self, key: K) -> &mut V {
        &mut self.values[K::index_table().slot(key)]
    }
}

impl<K: EnumKey, V: DenseValue> FromIterator<(K, V)> for EnumMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.set(key, value);
        }
        map
    }
}

impl<K: EnumKey, V: DenseValue> StateBlock for EnumMap<K, V> {
    fn write_block(&self, writer: &mut dyn StateWriter, block: &str) {
        self.write_sparse(writer, block);
    }

    fn read_block(&mut self, reader: &dyn StateReader, block: &str) -> Result<()> {
        self.read_sparse(reader, block)
    }

    fn same_state(&self, other: &Self) -> bool {
        self.values
            .iter()
            .zip(other.values.iter())
            .all(|(a, b)| a.into_value().is_identical(&b.into_value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::StateNode;

    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, strum::EnumIter, strum::EnumString, strum::IntoStaticStr,
    )]
    enum Stat {
        Agi,
        Defence,
        Int,
        MaxHit,
        MaxHP,
        MaxMP,
        MinHit,
        Str,
    }

    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, strum::EnumIter, strum::EnumString, strum::IntoStaticStr,
    )]
    enum Sparse {
        Zero = 0,
        Three = 3,
        Seven = 7,
    }

    crate::enum_key!(Stat, Sparse);

    #[test]
    fn sparse_write_emits_only_non_default_entries() {
        let map: EnumMap<Stat, i32> = [(Stat::MaxHP, 50), (Stat::MaxMP, 50)].into_iter().collect();

        let mut node = StateNode::new();
        map.write_sparse(&mut node, "stats");

        let entries = node.block("stats").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].read_string("key"), Ok(Some("MaxHP".to_owned())));
        assert_eq!(entries[0].read_int("value"), Ok(Some(50)));
        assert_eq!(entries[1].read_string("key"), Ok(Some("MaxMP".to_owned())));
    }

    #[test]
    fn sparse_read_resets_members_missing_from_the_stream() {
        let map: EnumMap<Stat, i32> = [(Stat::MaxHP, 50), (Stat::MaxMP, 50)].into_iter().collect();
        let mut node = StateNode::new();
        map.write_sparse(&mut node, "stats");

        let mut target = EnumMap::<Stat, i32>::new();
        target.set(Stat::Agi, 9);
        target.set(Stat::MaxHP, 1);
        target.read_sparse(&node, "stats").unwrap();

        assert_eq!(target, map);
        assert_eq!(target.get(Stat::Agi), 0);
        assert_eq!(target.get(Stat::MaxHP), 50);
        assert_eq!(target.get(Stat::MaxMP), 50);
        assert_eq!(target.non_default_count(), 2);
    }

    #[test]
    fn non_contiguous_members_round_trip() {
        let mut map = EnumMap::<Sparse, u16>::new();
        assert_eq!(map.len(), 3);

        map.set(Sparse::Zero, 1);
        map.set(Sparse::Three, 2);
        map[Sparse::Seven] += 3;

        assert_eq!(map.get(Sparse::Zero), 1);
        assert_eq!(map.get(Sparse::Three), 2);
        assert_eq!(map[Sparse::Seven], 3);

        let keys: Vec<Sparse> = map.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![Sparse::Zero, Sparse::Three, Sparse::Seven]);

        // Iteration restarts from the first slot every time.
        assert_eq!(map.iter().count(), map.iter().count());
    }

    #[test]
    fn unknown_member_names_are_rejected() {
        let node = StateNode::new().with_block(
            "stats",
            vec![StateNode::new().with("key", "Luck").with("value", 1)],
        );

        let mut map = EnumMap::<Stat, i32>::new();
        map.set(Stat::Str, 4);
        let err = map.read_sparse(&node, "stats").unwrap_err();

        assert_eq!(err.error_code(), "value_kind_mismatch");
        assert_eq!(err.column(), "stats.key");
        assert_eq!(map.get(Stat::Str), 4, "failed reads leave the map untouched");
    }

    #[test]
    fn missing_block_clears_the_map() {
        let mut map = EnumMap::<Stat, i32>::new();
        map.set(Stat::Int, 7);
        map.read_sparse(&StateNode::new(), "stats").unwrap();
        assert_eq!(map.non_default_count(), 0);
    }

    #[test]
    fn nan_entries_keep_the_same_state() {
        let mut map = EnumMap::<Stat, f32>::new();
        map.set(Stat::Agi, f32::NAN);
        let copy = map.clone();

        assert_ne!(map, copy);
        assert!(map.same_state(&copy));

        let mut changed = copy.clone();
        changed.set(Stat::Agi, 1.0);
        assert!(!map.same_state(&changed));
    }

    #[test]
    fn entry_values_narrow_like_columns() {
        let node = StateNode::new().with_block(
            "stats",
            vec![StateNode::new().with("key", "Defence").with("value", Value::Int32(12))],
        );
        let mut map = EnumMap::<Stat, u8>::new();
        map.read_sparse(&node, "stats").unwrap();
        assert_eq!(map.get(Stat::Defence), 12);
    }
}
