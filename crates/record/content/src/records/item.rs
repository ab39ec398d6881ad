use std::sync::OnceLock;

use record_core::{ColumnCatalog, ColumnMetadata, ColumnSchema, EnumMap, FieldRegistry, SyncRecord};

use crate::ids::ItemId;
use crate::stats::ItemStatKind;

/// Static item template with its bonus stats.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemStats {
    pub id: ItemId,
    pub name: String,
    pub weight: u16,
    pub required_level: Option<u8>,
    pub tradable: bool,
    pub bonuses: EnumMap<ItemStatKind, i16>,
}

impl ItemStats {
    pub fn bonus(&self, kind: ItemStatKind) -> i16 {
        self.bonuses.get(kind)
    }

    /// Whether a character of `level` may equip the item.
    pub fn usable_at(&self, level: u16) -> bool {
        self.required_level
            .is_none_or(|required| level >= u16::from(required))
    }
}

impl SyncRecord for ItemStats {
    fn registry() -> &'static FieldRegistry<Self> {
        static REGISTRY: OnceLock<FieldRegistry<ItemStats>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            FieldRegistry::builder("item_stats")
                .field("ItemId", |i: &ItemStats| i.id, |i, v| i.id = v)
                .field("Name", |i: &ItemStats| i.name.clone(), |i, v| i.name = v)
                .field("Weight", |i: &ItemStats| i.weight, |i, v| i.weight = v)
                .field("RequiredLevel", |i: &ItemStats| i.required_level, |i, v| {
                    i.required_level = v
                })
                .field("Tradable", |i: &ItemStats| i.tradable, |i, v| i.tradable = v)
                .block("Bonuses", |i: &ItemStats| &i.bonuses, |i| &mut i.bonuses)
                .build()
        })
    }
}

impl ColumnSchema for ItemStats {
    fn column_catalog() -> &'static ColumnCatalog {
        static CATALOG: OnceLock<ColumnCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            ColumnCatalog::new(
                "item_stats",
                vec![
                    ColumnMetadata::of::<ItemId>("ItemId", "int(11)").primary_key(),
                    ColumnMetadata::of::<String>("Name", "varchar(64)").default_literal("''"),
                    ColumnMetadata::of::<u16>("Weight", "smallint(5) unsigned")
                        .comment("Weight in tenths of a stone")
                        .default_literal("'0'"),
                    ColumnMetadata::of::<Option<u8>>("RequiredLevel", "tinyint(3) unsigned")
                        .default_literal("NULL"),
                    ColumnMetadata::of::<bool>("Tradable", "bit(1)").default_literal("b'1'"),
                ],
            )
        })
    }
}
