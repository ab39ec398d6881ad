use std::sync::OnceLock;

use record_core::{ColumnCatalog, ColumnMetadata, ColumnSchema, EnumMap, FieldRegistry, SyncRecord};

use crate::ids::{AccountId, CharacterId};
use crate::stats::StatKind;

/// Progression and stat block of one character.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CharacterStats {
    pub id: CharacterId,
    pub account: AccountId,
    pub level: u16,
    pub experience: u32,
    pub run_speed: f32,
    /// Unspent stat points; `None` until the first level up.
    pub free_points: Option<u16>,
    pub stats: EnumMap<StatKind, i32>,
}

impl CharacterStats {
    pub fn stat(&self, kind: StatKind) -> i32 {
        self.stats.get(kind)
    }

    pub fn set_stat(&mut self, kind: StatKind, value: i32) {
        self.stats.set(kind, value);
    }

    /// Average of the hit range, rounded down.
    pub fn average_hit(&self) -> i32 {
        (self.stat(StatKind::MinHit) + self.stat(StatKind::MaxHit)) / 2
    }
}

impl SyncRecord for CharacterStats {
    fn registry() -> &'static FieldRegistry<Self> {
        static REGISTRY: OnceLock<FieldRegistry<CharacterStats>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            FieldRegistry::builder("character_stats")
                .field("CharacterId", |c: &CharacterStats| c.id, |c, v| c.id = v)
                .field("AccountId", |c: &CharacterStats| c.account, |c, v| c.account = v)
                .field("Level", |c: &CharacterStats| c.level, |c, v| c.level = v)
                .field("Experience", |c: &CharacterStats| c.experience, |c, v| c.experience = v)
                .field("RunSpeed", |c: &CharacterStats| c.run_speed, |c, v| c.run_speed = v)
                .field("FreePoints", |c: &CharacterStats| c.free_points, |c, v| c.free_points = v)
                .block("Stats", |c: &CharacterStats| &c.stats, |c| &mut c.stats)
                .build()
        })
    }
}

impl ColumnSchema for CharacterStats {
    fn column_catalog() -> &'static ColumnCatalog {
        static CATALOG: OnceLock<ColumnCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            ColumnCatalog::new(
                "character_stats",
                vec![
                    ColumnMetadata::of::<CharacterId>("CharacterId", "int(11)").primary_key(),
                    ColumnMetadata::of::<AccountId>("AccountId", "int(11)")
                        .foreign_key()
                        .comment("Owning account"),
                    ColumnMetadata::of::<u16>("Level", "smallint(5) unsigned")
                        .default_literal("'1'"),
                    ColumnMetadata::of::<u32>("Experience", "int(10) unsigned")
                        .default_literal("'0'"),
                    ColumnMetadata::of::<f32>("RunSpeed", "float").default_literal("'1'"),
                    ColumnMetadata::of::<Option<u16>>("FreePoints", "smallint(5) unsigned")
                        .default_literal("NULL"),
                ],
            )
        })
    }
}
