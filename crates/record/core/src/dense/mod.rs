//! Enum-keyed dense value vectors.
//!
//! A bounded enumeration (finite, integer backed, possibly non-contiguous)
//! is mapped onto compact slots `0..N` once per enum type by an
//! [`IndexTable`]. Every [`EnumMap`] over that enum shares the table and owns
//! only its `N` values.
//!
//! ```text
//! enum ordinal:   0   1   2   3   4   5   6   7
//! forward:       [0,  -,  -,  1,  -,  -,  -,  2]
//! reverse:       [A,  D,  H]
//! dense values:  [vA, vD, vH]
//! ```

mod map;
mod table;

pub use map::{DenseValue, EnumMap};
pub use table::{EnumKey, IndexTable, MAX_ORDINAL};

/// Implements [`EnumKey`] for fieldless enums deriving `strum::EnumIter`,
/// `strum::EnumString` and `strum::IntoStaticStr`.
///
/// Each enum gets its own lazily built, process-wide [`IndexTable`].
#[macro_export]
macro_rules! enum_key {
    ($($ty:ident),+ $(,)?) => {$(
        impl $crate::dense::EnumKey for $ty {
            const DOMAIN: &'static str = stringify!($ty);

            #[inline]
            fn ordinal(self) -> usize {
                self as usize
            }

            fn index_table() -> &'static $crate::dense::IndexTable<Self> {
                static TABLE: ::std::sync::OnceLock<$crate::dense::IndexTable<$ty>> =
                    ::std::sync::OnceLock::new();
                TABLE.get_or_init($crate::dense::IndexTable::build)
            }
        }
    )+};
}
