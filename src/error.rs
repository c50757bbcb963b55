/*!
error module defines the batch-level error types used in obmp-parsed.

Column-level problems are never raised through [ParserError]; they are reported as
[FieldError](crate::models::FieldError)s attached to the decoded record.
*/
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    /// The schema registry has no base layout, so no record can be decoded at all.
    ///
    /// ## Occurs during:
    ///  - Resolving the schema for a batch
    #[error("no base schema registered, unable to resolve a field layout")]
    UnresolvableSchema,
    /// A textual schema version could not be parsed.
    ///
    /// ## Occurs during:
    ///  - Parsing a [SchemaVersion](crate::models::SchemaVersion) from a string
    #[error("invalid schema version {0:?}")]
    InvalidSchemaVersion(String),
    /// A general IO error triggered while reading an input file.
    #[error(transparent)]
    IoError(#[from] io::Error),
    #[cfg(feature = "oneio")]
    #[error(transparent)]
    OneIoError(#[from] oneio::OneIoError),
}
