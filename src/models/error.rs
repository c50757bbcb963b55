use thiserror::Error;

/// Why a single column failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldErrorKind {
    /// The line ended before this column.
    #[error("column missing from record")]
    Missing,
    /// A required column was present but empty.
    #[error("required value is empty")]
    Empty,
    #[error("invalid integer {0:?}")]
    InvalidInteger(String),
    /// The value parsed but does not fit the attribute's integer type.
    #[error("value {0} out of range")]
    OutOfRange(i64),
    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),
    /// The schema paired a field with a coercer producing the wrong kind of value.
    #[error("unexpected {0} value")]
    TypeMismatch(&'static str),
}

/// A column that could not be decoded into its attribute.
///
/// The attribute is left at its default value; the rest of the record is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error("field {name} (column {position}): {kind}")]
pub struct FieldError {
    /// Field name as listed in the schema header.
    pub name: &'static str,
    /// Zero-based index of the first raw column of the field.
    pub position: usize,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(name: &'static str, position: usize, kind: FieldErrorKind) -> Self {
        FieldError {
            name,
            position,
            kind,
        }
    }

    /// Returns true if the error only means the line was shorter than the schema.
    pub fn is_missing(&self) -> bool {
        self.kind == FieldErrorKind::Missing
    }
}
