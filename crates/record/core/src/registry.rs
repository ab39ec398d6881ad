//! Per-record-type table of synchronized fields.
//!
//! A [`FieldRegistry`] is the explicit replacement for reflecting over marked
//! fields: each record type builds one list of named descriptors, once, and
//! every state read/write and by-name access dispatches through it.
//!
//! # Descriptor shapes
//!
//! - **Scalar** fields convert through [`Value`] with a typed getter/setter.
//! - **Block** fields (e.g. an [`EnumMap`](crate::EnumMap)) write and read
//!   their own named sub-block through [`StateBlock`]. They take part in state
//!   streams, deep copies and deltas, but not in by-name column access.
//!
//! Setters and block reads are staged: converting the input yields a
//! [`Commit`] that assigns it. `read_state` stages every field before
//! committing any, so a failed read leaves the record unchanged.

use std::collections::HashMap;

use tracing::trace;

use crate::config::SyncConfig;
use crate::error::{RecordError, Result};
use crate::stream::{StateReader, StateWriter};
use crate::value::{FieldKind, FieldValue, Value, ValueError};

/// A synchronized field that persists itself as a named sub-block.
pub trait StateBlock: Clone + PartialEq {
    fn write_block(&self, writer: &mut dyn StateWriter, block: &str);

    fn read_block(&mut self, reader: &dyn StateReader, block: &str) -> Result<()>;

    /// Change-detection equality. Defaults to `==`.
    fn same_state(&self, other: &Self) -> bool {
        self == other
    }
}

/// Deferred assignment of an already converted field value.
pub type Commit<R> = Box<dyn FnOnce(&mut R)>;

type Getter<R> = Box<dyn Fn(&R) -> Value + Send + Sync>;
type Setter<R> =
    Box<dyn Fn(Value) -> std::result::Result<Commit<R>, ValueError> + Send + Sync>;
type BlockWriter<R> = Box<dyn Fn(&R, &mut dyn StateWriter) + Send + Sync>;
type BlockReader<R> = Box<dyn Fn(&R, &dyn StateReader) -> Result<Commit<R>> + Send + Sync>;
type BlockCopier<R> = Box<dyn Fn(&R, &mut R) + Send + Sync>;
type BlockComparer<R> = Box<dyn Fn(&R, &R) -> bool + Send + Sync>;

enum Access<R> {
    Scalar {
        kind: FieldKind,
        get: Getter<R>,
        set: Setter<R>,
    },
    Block {
        write: BlockWriter<R>,
        read: BlockReader<R>,
        copy: BlockCopier<R>,
        same: BlockComparer<R>,
    },
}

/// One synchronized field of record type `R`.
pub struct FieldDescriptor<R> {
    name: &'static str,
    access: Access<R>,
}

impl<R> FieldDescriptor<R> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared kind of a scalar field; `None` for block fields.
    pub fn kind(&self) -> Option<&FieldKind> {
        match &self.access {
            Access::Scalar { kind, .. } => Some(kind),
            Access::Block { .. } => None,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self.access, Access::Block { .. })
    }

    /// Writes this field of `record` to `writer`.
    pub fn write(&self, record: &R, writer: &mut dyn StateWriter) {
        match &self.access {
            Access::Scalar { get, .. } => {
                let value = get(record);
                trace!(field = self.name, %value, "write field");
                writer.write(self.name, value);
            }
            Access::Block { write, .. } => write(record, writer),
        }
    }

    /// Copies this field from `source` into `target`.
    pub fn copy(&self, source: &R, target: &mut R) -> std::result::Result<(), ValueError> {
        match &self.access {
            Access::Scalar { get, set, .. } => {
                set(get(source))?(target);
                Ok(())
            }
            Access::Block { copy, .. } => {
                copy(source, target);
                Ok(())
            }
        }
    }

    /// Returns true when the field holds different values in `a` and `b`.
    ///
    /// Floats compare bitwise, so a NaN field is unchanged against itself.
    pub fn differs(&self, a: &R, b: &R) -> bool {
        match &self.access {
            Access::Scalar { get, .. } => !get(a).is_identical(&get(b)),
            Access::Block { same, .. } => !same(a, b),
        }
    }
}

/// Immutable, declaration-ordered set of field descriptors for one record type.
pub struct FieldRegistry<R> {
    record: &'static str,
    fields: Vec<FieldDescriptor<R>>,
    by_name: HashMap<&'static str, usize>,
}

impl<R: 'static> FieldRegistry<R> {
    pub fn builder(record: &'static str) -> RegistryBuilder<R> {
        RegistryBuilder {
            record,
            fields: Vec::new(),
        }
    }

    pub fn record_name(&self) -> &'static str {
        self.record
    }

    /// Descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor<R>> + '_ {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn descriptor(&self, name: &str) -> Option<&FieldDescriptor<R>> {
        self.by_name.get(name).map(|&index| &self.fields[index])
    }

    /// Scalar descriptor for by-name access; blocks are not columns.
    fn column(&self, name: &str) -> Result<(&FieldKind, &Getter<R>, &Setter<R>)> {
        match self.descriptor(name).map(|field| &field.access) {
            Some(Access::Scalar { kind, get, set }) => Ok((kind, get, set)),
            _ => Err(RecordError::unknown_column(self.record, name)),
        }
    }

    /// Writes every field, in declaration order.
    pub fn write_state(&self, record: &R, writer: &mut dyn StateWriter) {
        for field in &self.fields {
            field.write(record, writer);
        }
    }

    /// Assigns every named value of `reader` that matches a scalar field, then
    /// lets each block field whose sub-block is present read it.
    ///
    /// Names the record does not know are reported per `config` and skipped;
    /// fields absent from the stream keep their current value. Nothing is
    /// assigned unless every matched value converts.
    pub fn read_state(
        &self,
        record: &mut R,
        reader: &dyn StateReader,
        config: &SyncConfig,
    ) -> Result<()> {
        let mut staged: Vec<Commit<R>> = Vec::new();

        for name in reader.names() {
            let Some(value) = reader.read_value(name) else {
                continue;
            };
            match self.descriptor(name).map(|field| (field.name, &field.access)) {
                Some((field, Access::Scalar { set, .. })) => {
                    trace!(record = self.record, field, %value, "read field");
                    let commit = set(value.clone())
                        .map_err(|source| RecordError::kind_mismatch(self.record, field, source))?;
                    staged.push(commit);
                }
                Some((_, Access::Block { .. })) | None => {
                    config.unknown_fields.report(self.record, name)
                }
            }
        }

        for field in &self.fields {
            if let Access::Block { read, .. } = &field.access
                && reader.has_block(field.name)
            {
                staged.push(read(record, reader)?);
            }
        }

        for commit in staged {
            commit(record);
        }
        Ok(())
    }

    pub fn get_value(&self, record: &R, name: &str) -> Result<Value> {
        let (_, get, _) = self.column(name)?;
        Ok(get(record))
    }

    pub fn set_value(&self, record: &mut R, name: &str, value: Value) -> Result<()> {
        let (_, _, set) = self.column(name)?;
        let commit =
            set(value).map_err(|source| RecordError::kind_mismatch(self.record, name, source))?;
        commit(record);
        Ok(())
    }

    /// Declared kind of a scalar column.
    pub fn column_kind(&self, name: &str) -> Result<&FieldKind> {
        self.column(name).map(|(kind, _, _)| kind)
    }

    /// Copies every registered field from `source` into `target`.
    pub fn copy_into(&self, source: &R, target: &mut R) {
        for field in &self.fields {
            // Same descriptor on both sides: the getter's value always fits the setter.
            if let Err(err) = field.copy(source, target) {
                tracing::error!(
                    record = self.record,
                    field = field.name,
                    %err,
                    "field copy rejected"
                );
            }
        }
    }

    /// Descriptors whose values differ between `before` and `after`.
    pub fn changed<'a>(
        &'a self,
        before: &'a R,
        after: &'a R,
    ) -> impl Iterator<Item = &'a FieldDescriptor<R>> + 'a {
        self.fields.iter().filter(move |field| field.differs(before, after))
    }
}

/// Accumulates descriptors in declaration order.
pub struct RegistryBuilder<R> {
    record: &'static str,
    fields: Vec<FieldDescriptor<R>>,
}

impl<R: 'static> RegistryBuilder<R> {
    /// Registers a scalar field.
    #[must_use]
    pub fn field<T: FieldValue + 'static>(
        mut self,
        name: &'static str,
        get: fn(&R) -> T,
        set: fn(&mut R, T),
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            access: Access::Scalar {
                kind: T::field_kind(),
                get: Box::new(move |record: &R| get(record).into_value()),
                set: Box::new(move |value: Value| -> std::result::Result<Commit<R>, ValueError> {
                    let value = T::from_value(value)?;
                    Ok(Box::new(move |record: &mut R| set(record, value)) as Commit<R>)
                }),
            },
        });
        self
    }

    /// Registers a field persisted as its own named sub-block.
    #[must_use]
    pub fn block<B: StateBlock + 'static>(
        mut self,
        name: &'static str,
        get: fn(&R) -> &B,
        get_mut: fn(&mut R) -> &mut B,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            access: Access::Block {
                write: Box::new(move |record: &R, writer: &mut dyn StateWriter| {
                    get(record).write_block(writer, name)
                }),
                read: Box::new(move |record: &R, reader: &dyn StateReader| -> Result<Commit<R>> {
                    let mut block = get(record).clone();
                    block.read_block(reader, name)?;
                    Ok(Box::new(move |record: &mut R| *get_mut(record) = block) as Commit<R>)
                }),
                copy: Box::new(move |source: &R, target: &mut R| {
                    get_mut(target).clone_from(get(source))
                }),
                same: Box::new(move |a: &R, b: &R| get(a).same_state(get(b))),
            },
        });
        self
    }

    /// Finalizes the registry.
    ///
    /// # Panics
    ///
    /// Panics if two fields share a name; registries are static declarations.
    pub fn build(self) -> FieldRegistry<R> {
        let mut by_name = HashMap::with_capacity(self.fields.len());
        for (index, field) in self.fields.iter().enumerate() {
            let previous = by_name.insert(field.name, index);
            assert!(
                previous.is_none(),
                "field `{}` registered twice on `{}`",
                field.name,
                self.record
            );
        }

        tracing::debug!(
            record = self.record,
            fields = self.fields.len(),
            "built field registry"
        );

        FieldRegistry {
            record: self.record,
            fields: self.fields,
            by_name,
        }
    }
}
