use crate::models::{FieldErrorKind, RouteDistinguisher};
use chrono::{DateTime, Utc};

/// Typed value produced by a [Coercer](crate::parser::Coercer) from one or more raw columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Flag(bool),
    Timestamp(DateTime<Utc>),
    RouteDistinguisher(RouteDistinguisher),
}

impl FieldValue {
    pub const fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) => "integer",
            FieldValue::Flag(_) => "flag",
            FieldValue::Timestamp(_) => "timestamp",
            FieldValue::RouteDistinguisher(_) => "route distinguisher",
        }
    }

    pub fn into_text(self) -> Result<String, FieldErrorKind> {
        match self {
            FieldValue::Text(v) => Ok(v),
            other => Err(FieldErrorKind::TypeMismatch(other.type_name())),
        }
    }

    /// Narrows an integer value into the attribute's type, e.g. `u32` for an ASN.
    pub fn into_int<T: TryFrom<i64>>(self) -> Result<T, FieldErrorKind> {
        match self {
            FieldValue::Integer(v) => T::try_from(v).map_err(|_| FieldErrorKind::OutOfRange(v)),
            other => Err(FieldErrorKind::TypeMismatch(other.type_name())),
        }
    }

    pub fn into_flag(self) -> Result<bool, FieldErrorKind> {
        match self {
            FieldValue::Flag(v) => Ok(v),
            other => Err(FieldErrorKind::TypeMismatch(other.type_name())),
        }
    }

    pub fn into_timestamp(self) -> Result<DateTime<Utc>, FieldErrorKind> {
        match self {
            FieldValue::Timestamp(v) => Ok(v),
            other => Err(FieldErrorKind::TypeMismatch(other.type_name())),
        }
    }

    pub fn into_route_distinguisher(self) -> Result<RouteDistinguisher, FieldErrorKind> {
        match self {
            FieldValue::RouteDistinguisher(v) => Ok(v),
            other => Err(FieldErrorKind::TypeMismatch(other.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrowing() {
        assert_eq!(FieldValue::Integer(65001).into_int::<u32>(), Ok(65001));
        assert_eq!(
            FieldValue::Integer(-1).into_int::<u32>(),
            Err(FieldErrorKind::OutOfRange(-1))
        );
        assert_eq!(
            FieldValue::Integer(300).into_int::<u8>(),
            Err(FieldErrorKind::OutOfRange(300))
        );
    }

    #[test]
    fn test_type_mismatch() {
        assert_eq!(
            FieldValue::Text("1".to_string()).into_int::<u32>(),
            Err(FieldErrorKind::TypeMismatch("text"))
        );
        assert_eq!(
            FieldValue::Integer(1).into_flag(),
            Err(FieldErrorKind::TypeMismatch("integer"))
        );
        assert_eq!(
            FieldValue::Flag(true).into_text(),
            Err(FieldErrorKind::TypeMismatch("flag"))
        );
    }
}
