/*!
Column coercers: pure conversions from raw column text into a [FieldValue].

Every coercer is total. A value that cannot be converted is reported as a [FieldErrorKind] and
never panics.
*/
use crate::models::{FieldErrorKind, FieldValue, RouteDistinguisher};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Timestamp layouts written by the collector, tried in order after RFC 3339.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Conversion rule applied to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercer {
    /// Text that must not be empty.
    Required,
    /// Text, empty allowed.
    NullAsEmpty,
    /// 32-bit integer; empty fails.
    Integer,
    /// 64-bit integer; empty fails.
    Long,
    /// 32-bit integer; empty is `0`.
    IntegerEmptyAsZero,
    /// 64-bit integer; empty is `0`.
    LongEmptyAsZero,
    /// `literal` maps to `matched`, any other value (empty included) to `!matched`.
    Flag { literal: &'static str, matched: bool },
    /// RFC 3339, or `YYYY-MM-DD HH:MM:SS[.ffffff]` taken as UTC.
    Timestamp,
    /// Two columns: `administrator:assigned` text, then the RD type (empty is `0`).
    RouteDistinguisher,
}

impl Coercer {
    /// Number of raw columns the coercer consumes.
    pub const fn width(&self) -> usize {
        match self {
            Coercer::RouteDistinguisher => 2,
            _ => 1,
        }
    }

    /// Converts `raw` into a typed value. `raw` holds exactly [Coercer::width] columns.
    pub fn coerce(&self, raw: &[&str]) -> Result<FieldValue, FieldErrorKind> {
        match (self, raw) {
            (Coercer::RouteDistinguisher, [value, rd_type]) => {
                let v = parse_integer(rd_type, true)?;
                let rd_type = u8::try_from(v).map_err(|_| FieldErrorKind::OutOfRange(v))?;
                Ok(FieldValue::RouteDistinguisher(RouteDistinguisher::new(
                    *value, rd_type,
                )))
            }
            (Coercer::RouteDistinguisher, _) => Err(FieldErrorKind::Missing),
            (coercer, [value]) => coercer.coerce_single(value),
            _ => Err(FieldErrorKind::Missing),
        }
    }

    fn coerce_single(&self, value: &str) -> Result<FieldValue, FieldErrorKind> {
        match self {
            Coercer::Required => match value.is_empty() {
                true => Err(FieldErrorKind::Empty),
                false => Ok(FieldValue::Text(value.to_string())),
            },
            Coercer::NullAsEmpty => Ok(FieldValue::Text(value.to_string())),
            Coercer::Integer => parse_i32(value, false),
            Coercer::IntegerEmptyAsZero => parse_i32(value, true),
            Coercer::Long => parse_integer(value, false).map(FieldValue::Integer),
            Coercer::LongEmptyAsZero => parse_integer(value, true).map(FieldValue::Integer),
            Coercer::Flag { literal, matched } => Ok(FieldValue::Flag(match value == *literal {
                true => *matched,
                false => !*matched,
            })),
            Coercer::Timestamp => parse_timestamp(value).map(FieldValue::Timestamp),
            Coercer::RouteDistinguisher => Err(FieldErrorKind::Missing),
        }
    }
}

fn parse_integer(value: &str, empty_as_zero: bool) -> Result<i64, FieldErrorKind> {
    if value.is_empty() && empty_as_zero {
        return Ok(0);
    }
    value
        .parse::<i64>()
        .map_err(|_| FieldErrorKind::InvalidInteger(value.to_string()))
}

fn parse_i32(value: &str, empty_as_zero: bool) -> Result<FieldValue, FieldErrorKind> {
    let v = parse_integer(value, empty_as_zero)?;
    i32::try_from(v).map_err(|_| FieldErrorKind::OutOfRange(v))?;
    Ok(FieldValue::Integer(v))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, FieldErrorKind> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|ts| ts.and_utc())
        .ok_or_else(|| FieldErrorKind::InvalidTimestamp(value.to_string()))
}
