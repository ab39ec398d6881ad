use std::fmt;
use std::str::FromStr;

use strum::IntoEnumIterator;

/// Forward-table entry for ordinals that are not enum members.
const GAP: usize = usize::MAX;

/// Upper bound on member ordinals; the forward table has one entry per ordinal.
pub const MAX_ORDINAL: usize = u16::MAX as usize;

/// Bounded enumeration usable as an [`EnumMap`](super::EnumMap) key.
///
/// Implement with [`enum_key!`](crate::enum_key). Members are stored by name
/// (`IntoStaticStr` / `EnumString`) and slotted in declaration order
/// (`EnumIter`), independent of their integer values.
pub trait EnumKey:
    Copy
    + Eq
    + fmt::Debug
    + Send
    + Sync
    + 'static
    + IntoEnumIterator
    + FromStr
    + Into<&'static str>
{
    /// Name of the enumeration, for diagnostics.
    const DOMAIN: &'static str;

    /// Integer value of the member.
    ///
    /// Must be non-negative and at most [`MAX_ORDINAL`]. A negative
    /// discriminant cast to `usize` wraps and is rejected when the table is
    /// built.
    fn ordinal(self) -> usize;

    /// Translation table shared by every map keyed by this enum.
    fn index_table() -> &'static IndexTable<Self>;

    /// Stored name of the member.
    fn name(self) -> &'static str {
        self.into()
    }
}

/// Forward and reverse translation between enum ordinals and dense slots.
///
/// Built once per enum type and read-only afterwards.
#[derive(Debug)]
pub struct IndexTable<K> {
    /// `forward[ordinal]` is the member's slot, [`GAP`] for non-members.
    forward: Box<[usize]>,
    /// `reverse[slot]` is the member occupying the slot.
    reverse: Box<[K]>,
}

impl<K: EnumKey> IndexTable<K> {
    /// Assigns slots `0..N` to the members in declaration order.
    ///
    /// # Panics
    ///
    /// Panics if a member's ordinal exceeds [`MAX_ORDINAL`], which includes
    /// every negative discriminant.
    pub fn build() -> Self {
        let reverse: Box<[K]> = K::iter().collect();
        for key in reverse.iter() {
            assert!(
                key.ordinal() <= MAX_ORDINAL,
                "{}::{:?} has ordinal {}; enum keys need non-negative discriminants up to {}",
                K::DOMAIN,
                key,
                key.ordinal(),
                MAX_ORDINAL
            );
        }
        let span = reverse
            .iter()
            .map(|key| key.ordinal() + 1)
            .max()
            .unwrap_or(0);

        let mut forward = vec![GAP; span].into_boxed_slice();
        for (slot, key) in reverse.iter().enumerate() {
            forward[key.ordinal()] = slot;
        }

        tracing::debug!(
            domain = K::DOMAIN,
            members = reverse.len(),
            span,
            "built enum index table"
        );

        Self { forward, reverse }
    }

    #[inline]
    pub fn slot(&self, key: K) -> usize {
        self.forward[key.ordinal()]
    }

    #[inline]
    pub fn key(&self, slot: usize) -> K {
        self.reverse[slot]
    }

    /// Members in slot order.
    pub fn keys(&self) -> &[K] {
        &self.reverse
    }

    /// Number of members (dense slots).
    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    /// Length of the forward table: highest ordinal plus one.
    pub fn span(&self) -> usize {
        self.forward.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, strum::EnumIter, strum::EnumString, strum::IntoStaticStr,
    )]
    enum Sparse {
        A = 0,
        D = 3,
        H = 7,
    }

    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, strum::EnumIter, strum::EnumString, strum::IntoStaticStr,
    )]
    #[repr(i32)]
    enum Signed {
        Below = -1,
        Zero = 0,
    }

    crate::enum_key!(Sparse, Signed);

    #[test]
    fn slots_follow_declaration_order_not_values() {
        let table = Sparse::index_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.span(), 8);
        assert_eq!(table.slot(Sparse::A), 0);
        assert_eq!(table.slot(Sparse::D), 1);
        assert_eq!(table.slot(Sparse::H), 2);
        assert_eq!(table.keys(), &[Sparse::A, Sparse::D, Sparse::H]);
    }

    #[test]
    fn gaps_cover_non_member_ordinals() {
        let table = IndexTable::<Sparse>::build();
        let gaps = table.forward.iter().filter(|&&slot| slot == GAP).count();
        assert_eq!(gaps, 5);
        for slot in 0..table.len() {
            assert_eq!(table.slot(table.key(slot)), slot);
        }
    }

    #[test]
    #[should_panic(expected = "non-negative discriminants")]
    fn negative_discriminants_are_rejected() {
        let _ = IndexTable::<Signed>::build();
    }

    #[test]
    fn table_is_built_once_and_shared() {
        assert!(std::ptr::eq(Sparse::index_table(), Sparse::index_table()));
        assert_eq!(Sparse::D.name(), "D");
    }
}
