//! Static column metadata for database binders.
//!
//! The catalog is descriptive only: state streams and by-name accessors never
//! consult it. One catalog is built per record type and looked up by name.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::error::{RecordError, Result};
use crate::value::{FieldKind, FieldValue, IdValue, Value, ValueError, ValueKind};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Description of one table column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub name: &'static str,
    pub comment: &'static str,
    /// Storage type as declared in the schema (e.g. `int(11) unsigned`).
    pub storage_type: &'static str,
    /// Schema default, verbatim (e.g. `'0'`, `NULL`, `CURRENT_TIMESTAMP`).
    pub default_literal: Option<&'static str>,
    pub kind: ValueKind,
    pub nullable: bool,
    pub primary_key: bool,
    pub foreign_key: bool,
}

impl ColumnMetadata {
    pub fn new(name: &'static str, storage_type: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            comment: "",
            storage_type,
            default_literal: None,
            kind: kind.value,
            nullable: kind.nullable,
            primary_key: false,
            foreign_key: false,
        }
    }

    /// Column whose kind is taken from the Rust field type.
    pub fn of<T: FieldValue>(name: &'static str, storage_type: &'static str) -> Self {
        Self::new(name, storage_type, T::field_kind())
    }

    #[must_use]
    pub fn comment(mut self, comment: &'static str) -> Self {
        self.comment = comment;
        self
    }

    #[must_use]
    pub fn default_literal(mut self, literal: &'static str) -> Self {
        self.default_literal = Some(literal);
        self
    }

    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    #[must_use]
    pub fn foreign_key(mut self) -> Self {
        self.foreign_key = true;
        self
    }

    pub fn field_kind(&self) -> FieldKind {
        FieldKind {
            value: self.kind.clone(),
            nullable: self.nullable,
        }
    }

    /// Value an insert without this column would store.
    ///
    /// Without a literal, or with a server-side expression such as
    /// `CURRENT_TIMESTAMP`, this is the kind's own default.
    pub fn default_value(&self) -> std::result::Result<Value, ValueError> {
        match self.default_literal {
            Some(literal) if !is_expression(literal) => parse_literal(literal, &self.field_kind()),
            _ => Ok(self.field_kind().default_value()),
        }
    }
}

fn is_expression(literal: &str) -> bool {
    let literal = literal.trim();
    literal.eq_ignore_ascii_case("CURRENT_TIMESTAMP") || literal.ends_with("()")
}

fn parse_literal(literal: &str, kind: &FieldKind) -> std::result::Result<Value, ValueError> {
    let trimmed = literal.trim();
    if trimmed.eq_ignore_ascii_case("NULL") {
        return if kind.nullable {
            Ok(Value::Null(kind.value.clone()))
        } else {
            Err(ValueError::mismatch(kind.clone(), &Value::Null(kind.value.clone())))
        };
    }

    let text = trimmed.trim_matches('\'');
    let invalid = || ValueError::mismatch(kind.clone(), &Value::String(literal.to_owned()));
    match &kind.value {
        ValueKind::Int8 => text.parse().map(Value::Int8).map_err(|_| invalid()),
        ValueKind::UInt8 => text.parse().map(Value::UInt8).map_err(|_| invalid()),
        ValueKind::Int16 => text.parse().map(Value::Int16).map_err(|_| invalid()),
        ValueKind::UInt16 => text.parse().map(Value::UInt16).map_err(|_| invalid()),
        ValueKind::Int32 => text.parse().map(Value::Int32).map_err(|_| invalid()),
        ValueKind::UInt32 => text.parse().map(Value::UInt32).map_err(|_| invalid()),
        ValueKind::Float32 => text.parse().map(Value::Float32).map_err(|_| invalid()),
        ValueKind::Bool => match trimmed.strip_prefix('b').unwrap_or(trimmed).trim_matches('\'') {
            "1" => Ok(Value::Bool(true)),
            "0" => Ok(Value::Bool(false)),
            other if other.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            other if other.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        ValueKind::String => Ok(Value::String(text.to_owned())),
        ValueKind::DateTime => NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
            .map(Value::DateTime)
            .map_err(|_| invalid()),
        ValueKind::Id(id_kind) => text
            .parse()
            .map(|raw| {
                Value::Id(IdValue {
                    kind: id_kind.clone(),
                    raw,
                })
            })
            .map_err(|_| invalid()),
    }
}

/// Name-indexed column metadata of one record type.
#[derive(Debug)]
pub struct ColumnCatalog {
    record: &'static str,
    columns: Vec<ColumnMetadata>,
    by_name: HashMap<&'static str, usize>,
}

impl ColumnCatalog {
    /// # Panics
    ///
    /// Panics if two columns share a name; catalogs are static declarations.
    pub fn new(record: &'static str, columns: Vec<ColumnMetadata>) -> Self {
        let mut by_name = HashMap::with_capacity(columns.len());
        for (index, column) in columns.iter().enumerate() {
            let previous = by_name.insert(column.name, index);
            assert!(
                previous.is_none(),
                "column `{}` declared twice on `{}`",
                column.name,
                record
            );
        }
        Self {
            record,
            columns,
            by_name,
        }
    }

    pub fn record_name(&self) -> &'static str {
        self.record
    }

    /// Looks up a column by name.
    pub fn get(&self, name: &str) -> Result<&ColumnMetadata> {
        self.by_name
            .get(name)
            .map(|&index| &self.columns[index])
            .ok_or_else(|| RecordError::unknown_column(self.record, name))
    }

    /// Columns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnMetadata> + '_ {
        self.columns.iter()
    }

    pub fn primary_key(&self) -> impl Iterator<Item = &ColumnMetadata> + '_ {
        self.columns.iter().filter(|column| column.primary_key)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Record types that publish column metadata.
pub trait ColumnSchema {
    fn column_catalog() -> &'static ColumnCatalog;

    fn get_column_data(name: &str) -> Result<&'static ColumnMetadata> {
        Self::column_catalog().get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ColumnCatalog {
        ColumnCatalog::new(
            "account",
            vec![
                ColumnMetadata::of::<u32>("Id", "int(10) unsigned")
                    .primary_key()
                    .comment("Account number"),
                ColumnMetadata::of::<Option<u8>>("GmLevel", "tinyint(3) unsigned")
                    .default_literal("NULL"),
                ColumnMetadata::of::<bool>("Banned", "bit(1)").default_literal("b'0'"),
                ColumnMetadata::of::<NaiveDateTime>("Created", "datetime")
                    .default_literal("CURRENT_TIMESTAMP"),
            ],
        )
    }

    #[test]
    fn lookup_by_name() {
        let catalog = catalog();
        let id = catalog.get("Id").unwrap();
        assert!(id.primary_key);
        assert_eq!(id.kind, ValueKind::UInt32);
        assert_eq!(id.comment, "Account number");
        assert_eq!(catalog.primary_key().count(), 1);
    }

    #[test]
    fn unknown_column_is_an_error() {
        let err = catalog().get("Password").unwrap_err();
        assert_eq!(
            err,
            RecordError::UnknownColumn {
                record: "account",
                column: "Password".to_owned(),
            }
        );
    }

    #[test]
    #[should_panic(expected = "declared twice")]
    fn duplicate_columns_are_rejected() {
        let _ = ColumnCatalog::new(
            "account",
            vec![
                ColumnMetadata::of::<u32>("Id", "int(10) unsigned"),
                ColumnMetadata::of::<String>("Id", "varchar(32)"),
            ],
        );
    }

    #[test]
    fn default_literals_parse_into_the_column_kind() {
        let catalog = catalog();
        assert_eq!(
            catalog.get("GmLevel").unwrap().default_value(),
            Ok(Value::Null(ValueKind::UInt8))
        );
        assert_eq!(catalog.get("Banned").unwrap().default_value(), Ok(Value::Bool(false)));
        assert_eq!(
            catalog.get("Created").unwrap().default_value(),
            Ok(Value::DateTime(NaiveDateTime::default()))
        );

        let level = ColumnMetadata::of::<u16>("Level", "smallint(5)").default_literal("'1'");
        assert_eq!(level.default_value(), Ok(Value::UInt16(1)));

        let broken = ColumnMetadata::of::<u16>("Level", "smallint(5)").default_literal("'x'");
        assert!(broken.default_value().is_err());
    }
}
