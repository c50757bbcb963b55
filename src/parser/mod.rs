/*!
parser module: tokenizing, schema resolution and record decoding for parsed message bus payloads.
*/
use log::{debug, trace, warn};

pub mod coerce;
pub mod evpn;
pub mod record;
pub mod schema;
pub mod tokenizer;

pub use coerce::Coercer;
pub use evpn::{EvpnField, EVPN_PREFIX_REGISTRY};
pub use record::{decode_record, MsgBusRecord};
pub use schema::{FieldDef, FieldSpec, Schema, SchemaRegistry, SchemaStep};

use crate::error::ParserError;
use crate::models::{FieldError, SchemaVersion};
use tokenizer::{split_fields, split_lines};

/// Limits applied while tokenizing a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Records beyond this count are dropped.
    pub max_lines: usize,
    /// Columns beyond this count are dropped.
    pub max_fields: usize,
    /// Lines of this many characters or fewer are skipped as empty.
    pub min_line_len: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_lines: 5000,
            max_fields: 500,
            min_line_len: 3,
        }
    }
}

/// Non-fatal conditions observed while decoding a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BatchWarning {
    /// The payload had more than `limit` lines; the rest were not decoded.
    LinesTruncated { limit: usize },
    /// Line `line` had more than `limit` columns; the rest were dropped.
    FieldsTruncated { line: usize, limit: usize },
    /// Line `line` had fewer columns than the schema; the missing fields carry
    /// [Missing](crate::models::FieldErrorKind::Missing) errors.
    ShortRecord {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// One decoded line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParsedRecord<R> {
    /// 1-based line number in the payload.
    pub line: usize,
    pub record: R,
    /// Fields that could not be decoded, in column order.
    pub errors: Vec<FieldError>,
}

impl<R> ParsedRecord<R> {
    /// Returns true if every field of the schema was decoded.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Decoded records of one payload, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParsedBatch<R> {
    /// Threshold version of the layout used for the batch.
    pub schema_version: SchemaVersion,
    pub records: Vec<ParsedRecord<R>>,
    pub warnings: Vec<BatchWarning>,
}

impl<R> ParsedBatch<R> {
    /// Iterates over all field errors as `(line, error)`.
    pub fn field_errors(&self) -> impl Iterator<Item = (usize, &FieldError)> {
        self.records
            .iter()
            .flat_map(|r| r.errors.iter().map(move |e| (r.line, e)))
    }

    pub fn complete_records(&self) -> impl Iterator<Item = &R> {
        self.records
            .iter()
            .filter(|r| r.is_complete())
            .map(|r| &r.record)
    }

    /// Drops error metadata and returns the records.
    pub fn into_records(self) -> Vec<R> {
        self.records.into_iter().map(|r| r.record).collect()
    }

    pub fn is_truncated(&self) -> bool {
        self.warnings.iter().any(|w| {
            matches!(
                w,
                BatchWarning::LinesTruncated { .. } | BatchWarning::FieldsTruncated { .. }
            )
        })
    }
}

/// Decoder for parsed message bus payloads.
///
/// ```
/// use obmp_parsed::{EvpnPrefix, MsgBusParser, SchemaVersion};
///
/// let parser = MsgBusParser::new().with_max_lines(1);
/// let batch = parser
///     .decode::<EvpnPrefix>("add\t1\ta\tb\tc\nadd\t2\ta\tb\tc\n", SchemaVersion::new(1, 0))
///     .unwrap();
/// assert_eq!(batch.records.len(), 1);
/// assert!(batch.is_truncated());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgBusParser {
    config: ParserConfig,
}

impl MsgBusParser {
    pub fn new() -> MsgBusParser {
        MsgBusParser::default()
    }

    pub fn with_config(config: ParserConfig) -> MsgBusParser {
        MsgBusParser { config }
    }

    pub fn with_max_lines(self, max_lines: usize) -> MsgBusParser {
        MsgBusParser {
            config: ParserConfig {
                max_lines,
                ..self.config
            },
        }
    }

    pub fn with_max_fields(self, max_fields: usize) -> MsgBusParser {
        MsgBusParser {
            config: ParserConfig {
                max_fields,
                ..self.config
            },
        }
    }

    pub fn with_min_line_len(self, min_line_len: usize) -> MsgBusParser {
        MsgBusParser {
            config: ParserConfig {
                min_line_len,
                ..self.config
            },
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Decodes every non-empty line of `payload` with the layout of `version`.
    ///
    /// Malformed data never fails the call: bad columns become [FieldError]s on their record and
    /// oversized input becomes [BatchWarning]s. The only error is a registry without any layout.
    pub fn decode<R: MsgBusRecord>(
        &self,
        payload: &str,
        version: SchemaVersion,
    ) -> Result<ParsedBatch<R>, ParserError> {
        let schema = R::registry().resolve(version)?;
        let expected = schema.column_count();
        let mut warnings = vec![];

        let lines = split_lines(payload, self.config.max_lines);
        if lines.truncated {
            warn!(
                "payload exceeds {} lines, remaining lines dropped",
                self.config.max_lines
            );
            warnings.push(BatchWarning::LinesTruncated {
                limit: self.config.max_lines,
            });
        }

        let mut records = Vec::with_capacity(lines.items.len());
        for (index, line) in lines.items.iter().enumerate() {
            let line_no = index + 1;
            if line.chars().count() <= self.config.min_line_len {
                trace!("skipping empty line {}", line_no);
                continue;
            }

            let fields = split_fields(line, self.config.max_fields);
            if fields.truncated {
                warn!(
                    "line {} exceeds {} columns, remaining columns dropped",
                    line_no, self.config.max_fields
                );
                warnings.push(BatchWarning::FieldsTruncated {
                    line: line_no,
                    limit: self.config.max_fields,
                });
            }
            if fields.items.len() < expected {
                warnings.push(BatchWarning::ShortRecord {
                    line: line_no,
                    expected,
                    found: fields.items.len(),
                });
            }

            let (record, errors) = decode_record::<R>(&fields.items, &schema);
            for e in &errors {
                debug!("line {}: {}", line_no, e);
            }
            records.push(ParsedRecord {
                line: line_no,
                record,
                errors,
            });
        }

        Ok(ParsedBatch {
            schema_version: schema.version(),
            records,
            warnings,
        })
    }

    /// Reads a whole local file, optionally gzip or bzip2 compressed, and decodes it.
    #[cfg(feature = "oneio")]
    pub fn decode_path<R: MsgBusRecord>(
        &self,
        path: &str,
        version: SchemaVersion,
    ) -> Result<ParsedBatch<R>, ParserError> {
        use std::io::Read;

        let mut payload = String::new();
        oneio::get_reader(path)?.read_to_string(&mut payload)?;
        self.decode(&payload, version)
    }
}

/// Decodes `payload` with the default [ParserConfig].
pub fn decode_batch<R: MsgBusRecord>(
    payload: &str,
    version: SchemaVersion,
) -> Result<ParsedBatch<R>, ParserError> {
    MsgBusParser::default().decode(payload, version)
}
