//! Closed value model passed through by-name accessors and state streams.
//!
//! Every synchronized column converts to and from [`Value`] through
//! [`FieldValue`]. Conversion is strict: a value only lands in a field of a
//! different kind when the conversion is a lossless integer narrowing or
//! widening, or a plain integer narrowing into an identifier newtype.

use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDateTime;

/// Tag of a [`Value`], without its payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Bool,
    String,
    DateTime,
    /// Strongly typed identifier, tagged with the identifier kind (e.g. `account`).
    Id(Cow<'static, str>),
}

impl ValueKind {
    /// Identifier kind for the given tag.
    pub const fn id(kind: &'static str) -> Self {
        Self::Id(Cow::Borrowed(kind))
    }

    /// Returns true for the fixed-width integer kinds.
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Int8 | Self::UInt8 | Self::Int16 | Self::UInt16 | Self::Int32 | Self::UInt32
        )
    }

    /// Zero value of this kind: `0`, `false`, empty string, Unix epoch, id `0`.
    pub fn default_value(&self) -> Value {
        match self {
            Self::Int8 => Value::Int8(0),
            Self::UInt8 => Value::UInt8(0),
            Self::Int16 => Value::Int16(0),
            Self::UInt16 => Value::UInt16(0),
            Self::Int32 => Value::Int32(0),
            Self::UInt32 => Value::UInt32(0),
            Self::Float32 => Value::Float32(0.0),
            Self::Bool => Value::Bool(false),
            Self::String => Value::String(String::new()),
            Self::DateTime => Value::DateTime(NaiveDateTime::default()),
            Self::Id(kind) => Value::Id(IdValue {
                kind: kind.clone(),
                raw: 0,
            }),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Float32 => "float32",
            Self::Bool => "bool",
            Self::String => "string",
            Self::DateTime => "datetime",
            Self::Id(kind) => return write!(f, "id<{kind}>"),
        };
        f.write_str(name)
    }
}

/// Declared kind of a synchronized field: a value kind plus nullability.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldKind {
    pub value: ValueKind,
    pub nullable: bool,
}

impl FieldKind {
    pub const fn required(value: ValueKind) -> Self {
        Self {
            value,
            nullable: false,
        }
    }

    pub const fn nullable(value: ValueKind) -> Self {
        Self {
            value,
            nullable: true,
        }
    }

    /// Default of the field: `Null` for nullable fields, the kind's zero otherwise.
    pub fn default_value(&self) -> Value {
        if self.nullable {
            Value::Null(self.value.clone())
        } else {
            self.value.default_value()
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}?", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// Payload of an identifier value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdValue {
    pub kind: Cow<'static, str>,
    pub raw: i32,
}

impl IdValue {
    pub fn of<I: Identifier>(id: I) -> Self {
        Self {
            kind: Cow::Borrowed(I::KIND),
            raw: id.raw(),
        }
    }
}

/// A single column value.
///
/// Optional columns carry their present value as the plain variant and their
/// absent state as [`Value::Null`] tagged with the column's kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Float32(f32),
    Bool(bool),
    String(String),
    DateTime(NaiveDateTime),
    Id(IdValue),
    Null(ValueKind),
}

impl Value {
    /// Identifier value for a typed id.
    pub fn id<I: Identifier>(id: I) -> Self {
        Self::Id(IdValue::of(id))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int8(_) => ValueKind::Int8,
            Self::UInt8(_) => ValueKind::UInt8,
            Self::Int16(_) => ValueKind::Int16,
            Self::UInt16(_) => ValueKind::UInt16,
            Self::Int32(_) => ValueKind::Int32,
            Self::UInt32(_) => ValueKind::UInt32,
            Self::Float32(_) => ValueKind::Float32,
            Self::Bool(_) => ValueKind::Bool,
            Self::String(_) => ValueKind::String,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Id(id) => ValueKind::Id(id.kind.clone()),
            Self::Null(kind) => kind.clone(),
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null(_))
    }

    /// Equality for change detection: floats compare bitwise, so a NaN is
    /// identical to itself.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Float32(a), Self::Float32(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }

    /// Widened payload of a plain integer value. Identifiers are not integers.
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Self::Int8(v) => Some(v.into()),
            Self::UInt8(v) => Some(v.into()),
            Self::Int16(v) => Some(v.into()),
            Self::UInt16(v) => Some(v.into()),
            Self::Int32(v) => Some(v.into()),
            Self::UInt32(v) => Some(v.into()),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int8(v) => write!(f, "{v}"),
            Self::UInt8(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::UInt16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::UInt32(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::DateTime(v) => write!(f, "{v}"),
            Self::Id(id) => write!(f, "{}#{}", id.kind, id.raw),
            Self::Null(_) => f.write_str("null"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

/// Failure to convert a [`Value`] into a field's declared kind.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    KindMismatch { expected: FieldKind, found: ValueKind },

    #[error("integer {value} does not fit in {expected}")]
    OutOfRange { expected: FieldKind, value: i64 },

    #[error("`{name}` is not a member of {domain}")]
    UnknownMember { domain: &'static str, name: String },

    #[error("missing `{field}`, expected {expected}")]
    Missing {
        field: &'static str,
        expected: FieldKind,
    },
}

impl ValueError {
    pub fn mismatch(expected: FieldKind, found: &Value) -> Self {
        Self::KindMismatch {
            expected,
            found: found.kind(),
        }
    }
}

/// Typed Rust representation of a synchronized column.
pub trait FieldValue: Sized {
    /// Declared kind of fields of this type.
    fn field_kind() -> FieldKind;

    fn into_value(self) -> Value;

    fn from_value(value: Value) -> Result<Self, ValueError>;
}

macro_rules! integer_field {
    ($($ty:ty => $variant:ident),+ $(,)?) => {$(
        impl FieldValue for $ty {
            fn field_kind() -> FieldKind {
                FieldKind::required(ValueKind::$variant)
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: Value) -> Result<Self, ValueError> {
                if let Value::$variant(inner) = value {
                    return Ok(inner);
                }
                let raw = value
                    .as_integer()
                    .ok_or_else(|| ValueError::mismatch(Self::field_kind(), &value))?;
                <$ty>::try_from(raw).map_err(|_| ValueError::OutOfRange {
                    expected: Self::field_kind(),
                    value: raw,
                })
            }
        }

        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value)
            }
        }
    )+};
}

macro_rules! exact_field {
    ($($ty:ty => $variant:ident),+ $(,)?) => {$(
        impl FieldValue for $ty {
            fn field_kind() -> FieldKind {
                FieldKind::required(ValueKind::$variant)
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::$variant(inner) => Ok(inner),
                    other => Err(ValueError::mismatch(Self::field_kind(), &other)),
                }
            }
        }

        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value)
            }
        }
    )+};
}

integer_field!(
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
);

exact_field!(
    f32 => Float32,
    bool => Bool,
    String => String,
    NaiveDateTime => DateTime,
);

impl<T: FieldValue> FieldValue for Option<T> {
    fn field_kind() -> FieldKind {
        FieldKind::nullable(T::field_kind().value)
    }

    fn into_value(self) -> Value {
        match self {
            Some(inner) => inner.into_value(),
            None => Value::Null(T::field_kind().value),
        }
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null(kind) if kind == T::field_kind().value => Ok(None),
            Value::Null(kind) => Err(ValueError::KindMismatch {
                expected: Self::field_kind(),
                found: kind,
            }),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Newtype identifier backed by a 32-bit integer.
///
/// Implemented by [`define_id!`](crate::define_id), which also provides the
/// matching [`FieldValue`] implementation.
pub trait Identifier: Copy {
    /// Identifier kind tag carried by [`Value::Id`].
    const KIND: &'static str;

    fn from_raw(raw: i32) -> Self;

    fn raw(self) -> i32;
}

#[doc(hidden)]
pub fn identifier_from_value<I: Identifier>(value: Value) -> Result<I, ValueError> {
    let expected = FieldKind::required(ValueKind::id(I::KIND));
    match value {
        Value::Id(id) if id.kind == I::KIND => Ok(I::from_raw(id.raw)),
        Value::Id(id) => Err(ValueError::KindMismatch {
            expected,
            found: ValueKind::Id(id.kind),
        }),
        other => {
            let raw = other
                .as_integer()
                .ok_or_else(|| ValueError::mismatch(expected.clone(), &other))?;
            i32::try_from(raw)
                .map(I::from_raw)
                .map_err(|_| ValueError::OutOfRange {
                    expected,
                    value: raw,
                })
        }
    }
}

/// Declares identifier newtypes over `i32`.
///
/// ```
/// record_core::define_id! {
///     /// Account primary key.
///     pub struct AccountId => "account";
/// }
///
/// use record_core::{FieldValue, Value};
/// assert_eq!(AccountId::from_value(Value::Int32(7)), Ok(AccountId(7)));
/// ```
#[macro_export]
macro_rules! define_id {
    ($($(#[$meta:meta])* $vis:vis struct $name:ident => $kind:literal;)+) => {$(
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis struct $name(pub i32);

        impl $crate::value::Identifier for $name {
            const KIND: &'static str = $kind;

            fn from_raw(raw: i32) -> Self {
                Self(raw)
            }

            fn raw(self) -> i32 {
                self.0
            }
        }

        impl $crate::value::FieldValue for $name {
            fn field_kind() -> $crate::value::FieldKind {
                $crate::value::FieldKind::required($crate::value::ValueKind::id($kind))
            }

            fn into_value(self) -> $crate::value::Value {
                $crate::value::Value::id(self)
            }

            fn from_value(
                value: $crate::value::Value,
            ) -> ::core::result::Result<Self, $crate::value::ValueError> {
                $crate::value::identifier_from_value(value)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}#{}", $kind, self.0)
            }
        }
    )+};
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::define_id! {
        struct AccountId => "account";
        struct GuildId => "guild";
    }

    #[test]
    fn integers_convert_only_when_they_fit() {
        assert_eq!(u8::from_value(Value::Int32(200)), Ok(200));
        assert_eq!(i32::from_value(Value::UInt16(7)), Ok(7));
        assert_eq!(
            u8::from_value(Value::Int32(300)),
            Err(ValueError::OutOfRange {
                expected: FieldKind::required(ValueKind::UInt8),
                value: 300,
            })
        );
        assert!(matches!(
            i32::from_value(Value::from("12")),
            Err(ValueError::KindMismatch { .. })
        ));
    }

    #[test]
    fn floats_and_strings_are_never_coerced() {
        assert!(f32::from_value(Value::Int32(1)).is_err());
        assert!(String::from_value(Value::Int32(1)).is_err());
        assert!(bool::from_value(Value::UInt8(1)).is_err());
        assert_eq!(f32::from_value(Value::Float32(1.5)), Ok(1.5));
    }

    #[test]
    fn optional_round_trips_through_null() {
        assert_eq!(
            Option::<i16>::None.into_value(),
            Value::Null(ValueKind::Int16)
        );
        assert_eq!(Option::<i16>::from_value(Value::Null(ValueKind::Int16)), Ok(None));
        assert_eq!(Option::<i16>::from_value(Value::Int16(4)), Ok(Some(4)));
        assert!(Option::<i16>::from_value(Value::Null(ValueKind::String)).is_err());
        assert!(i16::from_value(Value::Null(ValueKind::Int16)).is_err());
        assert_eq!(Option::<i16>::field_kind().default_value(), Value::Null(ValueKind::Int16));
    }

    #[test]
    fn identifiers_narrow_from_plain_integers() {
        assert_eq!(AccountId::from_value(Value::Int32(42)), Ok(AccountId(42)));
        assert_eq!(AccountId::from_value(Value::id(AccountId(9))), Ok(AccountId(9)));
        assert!(AccountId::from_value(Value::id(GuildId(9))).is_err());
        assert!(AccountId::from_value(Value::UInt32(u32::MAX)).is_err());
        assert_eq!(Value::id(AccountId(3)).as_integer(), None);
        assert_eq!(AccountId(3).to_string(), "account#3");
    }

    #[test]
    fn identity_treats_nan_as_unchanged() {
        let nan = Value::Float32(f32::NAN);
        assert_ne!(nan, nan.clone());
        assert!(nan.is_identical(&nan.clone()));
        assert!(!nan.is_identical(&Value::Float32(0.0)));
        assert!(Value::Int32(3).is_identical(&Value::Int32(3)));
        assert!(!Value::Int32(3).is_identical(&Value::UInt32(3)));
    }

    #[test]
    fn kinds_render_for_diagnostics() {
        assert_eq!(ValueKind::id("account").to_string(), "id<account>");
        assert_eq!(FieldKind::nullable(ValueKind::Int32).to_string(), "int32?");
        assert_eq!(ValueKind::DateTime.default_value(), Value::DateTime(NaiveDateTime::default()));
    }
}
