//! Stat enumerations keyed into [`EnumMap`](record_core::EnumMap) columns.
//!
//! Members are persisted by name, so renaming a member is a format change
//! while reordering or renumbering is not.

/// Character stat slots.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatKind {
    /// Agility - evasion and attack speed
    Agi,
    Defence,
    /// Intelligence - spell power
    Int,
    MaxHit,
    #[strum(serialize = "MaxHP")]
    MaxHp,
    #[strum(serialize = "MaxMP")]
    MaxMp,
    MinHit,
    /// Strength - carry weight and melee damage
    Str,
}

/// Bonus stats granted by an item.
///
/// Values follow the legacy item table and leave gaps for retired bonuses.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemStatKind {
    Attack = 1,
    Defence = 4,
    Speed = 10,
    Critical = 16,
    /// Hit points restored per tick while equipped
    Regen = 17,
}

record_core::enum_key!(StatKind, ItemStatKind);

#[cfg(test)]
mod tests {
    use record_core::EnumKey;

    use super::*;

    #[test]
    fn members_are_stored_by_their_legacy_names() {
        assert_eq!(StatKind::MaxHp.name(), "MaxHP");
        assert_eq!("MaxMP".parse::<StatKind>(), Ok(StatKind::MaxMp));
        assert_eq!(StatKind::Str.to_string(), "Str");
    }

    #[test]
    fn item_stats_pack_into_dense_slots() {
        let table = ItemStatKind::index_table();
        assert_eq!(table.len(), 5);
        assert_eq!(table.span(), 18);
        assert_eq!(table.slot(ItemStatKind::Critical), 3);
        assert_eq!(table.key(4), ItemStatKind::Regen);
    }
}
