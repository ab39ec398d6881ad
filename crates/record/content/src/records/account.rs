use std::sync::OnceLock;

use chrono::NaiveDateTime;
use record_core::{ColumnCatalog, ColumnMetadata, ColumnSchema, FieldRegistry, SyncRecord};

use crate::ids::AccountId;

/// Login account.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub gm_level: u8,
    pub email: Option<String>,
    pub banned: bool,
    pub created_at: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
    /// Session flag; not persisted.
    pub online: bool,
}

impl Account {
    pub fn new(id: AccountId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_gm(&self) -> bool {
        self.gm_level > 0
    }
}

impl SyncRecord for Account {
    fn registry() -> &'static FieldRegistry<Self> {
        static REGISTRY: OnceLock<FieldRegistry<Account>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            FieldRegistry::builder("account")
                .field("Id", |a: &Account| a.id, |a, v| a.id = v)
                .field("Name", |a: &Account| a.name.clone(), |a, v| a.name = v)
                .field("GmLevel", |a: &Account| a.gm_level, |a, v| a.gm_level = v)
                .field("Email", |a: &Account| a.email.clone(), |a, v| a.email = v)
                .field("Banned", |a: &Account| a.banned, |a, v| a.banned = v)
                .field("CreatedAt", |a: &Account| a.created_at, |a, v| a.created_at = v)
                .field("LastLogin", |a: &Account| a.last_login, |a, v| a.last_login = v)
                .build()
        })
    }
}

impl ColumnSchema for Account {
    fn column_catalog() -> &'static ColumnCatalog {
        static CATALOG: OnceLock<ColumnCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            ColumnCatalog::new(
                "account",
                vec![
                    ColumnMetadata::of::<AccountId>("Id", "int(11)")
                        .primary_key()
                        .comment("Account number"),
                    ColumnMetadata::of::<String>("Name", "varchar(32)")
                        .comment("Login name")
                        .default_literal("''"),
                    ColumnMetadata::of::<u8>("GmLevel", "tinyint(3) unsigned")
                        .comment("Staff privilege level, 0 for players")
                        .default_literal("'0'"),
                    ColumnMetadata::of::<Option<String>>("Email", "varchar(255)")
                        .default_literal("NULL"),
                    ColumnMetadata::of::<bool>("Banned", "bit(1)").default_literal("b'0'"),
                    ColumnMetadata::of::<NaiveDateTime>("CreatedAt", "datetime")
                        .default_literal("CURRENT_TIMESTAMP"),
                    ColumnMetadata::of::<Option<NaiveDateTime>>("LastLogin", "datetime")
                        .default_literal("NULL"),
                ],
            )
        })
    }
}
