//! Reader/writer contracts that record state flows through.
//!
//! Both traits are named, not positional: values are addressed by field name
//! and nested sequences by block name. They are object safe so field
//! descriptors can hold plain function pointers over `dyn StateReader` /
//! `dyn StateWriter`; the generic conveniences live in the `*Ext` traits.

use std::str::FromStr;

use crate::dense::EnumKey;
use crate::error::RecordError;
use crate::value::{FieldKind, FieldValue, Value, ValueError, ValueKind};

/// Sink for named values and named sequences of sub-records.
pub trait StateWriter {
    /// Writes one named value.
    fn write(&mut self, name: &str, value: Value);

    /// Writes a named block of `count` sub-records, each produced by `write_item`.
    fn write_nodes(
        &mut self,
        block: &str,
        count: usize,
        write_item: &mut dyn FnMut(usize, &mut dyn StateWriter),
    );
}

/// Source of named values and named sequences of sub-records.
pub trait StateReader {
    /// Names of the values present in this node, in stream order.
    fn names(&self) -> Vec<&str>;

    fn read_value(&self, name: &str) -> Option<&Value>;

    fn has_block(&self, block: &str) -> bool;

    /// Visits every sub-record of `block`. An absent block has no sub-records.
    fn read_nodes(
        &self,
        block: &str,
        read_item: &mut dyn FnMut(&dyn StateReader) -> Result<(), RecordError>,
    ) -> Result<(), RecordError>;
}

/// Typed helpers over any [`StateWriter`].
pub trait StateWriterExt: StateWriter {
    fn write_many_nodes<T>(
        &mut self,
        block: &str,
        items: &[T],
        mut write_item: impl FnMut(&mut dyn StateWriter, &T),
    ) {
        self.write_nodes(block, items.len(), &mut |index, writer| {
            write_item(writer, &items[index])
        });
    }
}

impl<W: StateWriter + ?Sized> StateWriterExt for W {}

/// Typed helpers over any [`StateReader`].
///
/// Each `read_*` returns `Ok(None)` when the name is absent and an error when
/// the stored value cannot become the requested type.
pub trait StateReaderExt: StateReader {
    fn read<T: FieldValue>(&self, name: &str) -> Result<Option<T>, ValueError> {
        self.read_value(name)
            .map(|value| T::from_value(value.clone()))
            .transpose()
    }

    fn read_int(&self, name: &str) -> Result<Option<i32>, ValueError> {
        self.read(name)
    }

    fn read_string(&self, name: &str) -> Result<Option<String>, ValueError> {
        self.read(name)
    }

    fn read_bool(&self, name: &str) -> Result<Option<bool>, ValueError> {
        self.read(name)
    }

    /// Reads an enum member stored by name.
    fn read_enum<K: EnumKey>(&self, name: &str) -> Result<Option<K>, ValueError> {
        match self.read_value(name) {
            None => Ok(None),
            Some(Value::String(member)) => <K as FromStr>::from_str(member)
                .map(Some)
                .map_err(|_| ValueError::UnknownMember {
                    domain: K::DOMAIN,
                    name: member.clone(),
                }),
            Some(other) => Err(ValueError::mismatch(
                FieldKind::required(ValueKind::String),
                other,
            )),
        }
    }

    fn read_many_nodes<T>(
        &self,
        block: &str,
        mut read_item: impl FnMut(&dyn StateReader) -> Result<T, RecordError>,
    ) -> Result<Vec<T>, RecordError> {
        let mut items = Vec::new();
        self.read_nodes(block, &mut |node| {
            items.push(read_item(node)?);
            Ok(())
        })?;
        Ok(items)
    }
}

impl<R: StateReader + ?Sized> StateReaderExt for R {}
