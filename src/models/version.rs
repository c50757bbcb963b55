use crate::error::ParserError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Message bus schema version, e.g. `1.7`.
///
/// Versions are ordered by `(major, minor)`, so `1.10 > 1.7`. The version is negotiated outside
/// of this crate (it is carried by the message bus headers) and handed to the decoder with every
/// batch.
///
/// ```
/// use obmp_parsed::SchemaVersion;
///
/// let v: SchemaVersion = "1.7".parse().unwrap();
/// assert_eq!(v, SchemaVersion::new(1, 7));
/// assert!(v > SchemaVersion::new(1, 3));
/// assert_eq!(v.to_string(), "1.7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchemaVersion {
    pub major: u8,
    pub minor: u8,
}

impl SchemaVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        SchemaVersion { major, minor }
    }

    /// Builds a version from the major/minor bytes of an OpenBMP binary header.
    pub const fn from_major_minor(bytes: [u8; 2]) -> Self {
        SchemaVersion::new(bytes[0], bytes[1])
    }
}

impl Display for SchemaVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for SchemaVersion {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParserError::InvalidSchemaVersion(s.to_string());
        let (major, minor) = match s.trim().split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (s.trim(), "0"),
        };
        let major = major.parse::<u8>().map_err(|_| invalid())?;
        let minor = minor.parse::<u8>().map_err(|_| invalid())?;
        Ok(SchemaVersion::new(major, minor))
    }
}

/// Collectors announce the version as a float (`1.7`); only one decimal digit is significant.
impl From<f32> for SchemaVersion {
    fn from(value: f32) -> Self {
        let tenths = (value.max(0.0) * 10.0).round() as u32;
        let major = (tenths / 10).min(u8::MAX as u32) as u8;
        SchemaVersion::new(major, (tenths % 10) as u8)
    }
}
