/// How `read_state` reports stream names that match no synchronized field.
///
/// Unknown names are never an error; the policy only picks the log level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnknownFieldPolicy {
    /// Skip silently (debug level).
    #[default]
    Ignore,
    /// Skip and emit a warning.
    Warn,
}

impl UnknownFieldPolicy {
    pub(crate) fn report(self, record: &'static str, field: &str) {
        match self {
            Self::Ignore => tracing::debug!(record, field, "ignoring unknown stream field"),
            Self::Warn => tracing::warn!(record, field, "ignoring unknown stream field"),
        }
    }
}

/// Synchronization constants and tunable parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SyncConfig {
    /// Reporting of stream names with no matching field.
    pub unknown_fields: UnknownFieldPolicy,
}

impl SyncConfig {
    // ===== wire names of sparse block entries =====
    pub const SPARSE_KEY_FIELD: &'static str = "key";
    pub const SPARSE_VALUE_FIELD: &'static str = "value";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unknown_fields(unknown_fields: UnknownFieldPolicy) -> Self {
        Self { unknown_fields }
    }
}
