//! Errors raised by the by-name accessor protocol and column lookups.
//!
//! Only two failures exist. Both indicate a mismatch between the caller and
//! the record's schema, so they are propagated to the immediate caller and
//! never retried. State streams are read leniently: unknown or missing names
//! are not errors (see [`SyncRecord::read_state`](crate::SyncRecord::read_state)).

use thiserror::Error;

use crate::value::ValueError;

/// Errors surfaced by records, registries, and column catalogs.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("column `{column}` not found on `{record}`")]
    UnknownColumn { record: &'static str, column: String },

    #[error("column `{column}` on `{record}`: {source}")]
    ValueKindMismatch {
        record: &'static str,
        column: String,
        #[source]
        source: ValueError,
    },
}

impl RecordError {
    pub fn unknown_column(record: &'static str, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            record,
            column: column.into(),
        }
    }

    pub fn kind_mismatch(
        record: &'static str,
        column: impl Into<String>,
        source: ValueError,
    ) -> Self {
        Self::ValueKindMismatch {
            record,
            column: column.into(),
            source,
        }
    }

    /// Name of the column the error refers to.
    pub fn column(&self) -> &str {
        match self {
            Self::UnknownColumn { column, .. } | Self::ValueKindMismatch { column, .. } => column,
        }
    }

    /// Stable identifier of the error variant, for logs and tests.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownColumn { .. } => "unknown_column",
            Self::ValueKindMismatch { .. } => "value_kind_mismatch",
        }
    }
}

pub type Result<T> = std::result::Result<T, RecordError>;
