use crate::models::{FieldError, FieldErrorKind, FieldValue};
use crate::parser::{FieldSpec, Schema, SchemaRegistry};
use std::fmt::Debug;

/// A record type published on a parsed message bus topic.
///
/// Implementors provide the versioned column layout of their topic and know how to store a
/// coerced value into the matching attribute. Attributes start at their [Default] value.
pub trait MsgBusRecord: Default {
    /// Identifies one attribute of the record.
    type Field: Copy + Debug + PartialEq + 'static;

    /// Column layouts of the topic, per schema version.
    fn registry() -> &'static SchemaRegistry<Self::Field>;

    /// Stores `value` into `field`.
    fn apply(&mut self, field: Self::Field, value: FieldValue) -> Result<(), FieldErrorKind>;
}

/// Decodes one tokenized line with `schema`.
///
/// Always returns a record. Every field of the schema is visited; a field whose columns are
/// absent or fail to coerce keeps its default value and yields a [FieldError]. Columns beyond
/// the schema are ignored.
pub fn decode_record<R: MsgBusRecord>(
    fields: &[&str],
    schema: &Schema<R::Field>,
) -> (R, Vec<FieldError>) {
    let mut record = R::default();
    let mut errors = Vec::new();
    for spec in schema.fields() {
        if let Err(kind) = decode_field(&mut record, fields, spec) {
            errors.push(FieldError::new(spec.name, spec.position, kind));
        }
    }
    (record, errors)
}

fn decode_field<R: MsgBusRecord>(
    record: &mut R,
    fields: &[&str],
    spec: &FieldSpec<R::Field>,
) -> Result<(), FieldErrorKind> {
    let raw = fields.get(spec.columns()).ok_or(FieldErrorKind::Missing)?;
    let value = spec.coercer.coerce(raw)?;
    record.apply(spec.field, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SchemaVersion;
    use crate::parser::schema::{FieldDef, SchemaStep};
    use crate::parser::Coercer;

    #[derive(Debug, Default, PartialEq)]
    struct Peer {
        name: String,
        asn: u32,
        up: bool,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum PeerField {
        Name,
        Asn,
        Up,
    }

    static PEER_STEPS: [SchemaStep<PeerField>; 1] = [SchemaStep {
        since: SchemaVersion::new(1, 0),
        fields: &[
            FieldDef::new(PeerField::Name, "name", Coercer::Required),
            FieldDef::new(PeerField::Asn, "asn", Coercer::Long),
            // deliberately paired with a coercer of the wrong kind
            FieldDef::new(PeerField::Up, "up", Coercer::LongEmptyAsZero),
        ],
    }];
    static PEER_REGISTRY: SchemaRegistry<PeerField> = SchemaRegistry::new(&PEER_STEPS);

    impl MsgBusRecord for Peer {
        type Field = PeerField;

        fn registry() -> &'static SchemaRegistry<PeerField> {
            &PEER_REGISTRY
        }

        fn apply(&mut self, field: PeerField, value: FieldValue) -> Result<(), FieldErrorKind> {
            match field {
                PeerField::Name => self.name = value.into_text()?,
                PeerField::Asn => self.asn = value.into_int()?,
                PeerField::Up => self.up = value.into_flag()?,
            }
            Ok(())
        }
    }

    fn schema() -> Schema<PeerField> {
        Peer::registry().resolve(SchemaVersion::new(1, 0)).unwrap()
    }

    #[test]
    fn test_bad_field_is_isolated() {
        let (peer, errors) = decode_record::<Peer>(&["r1", "x", ""], &schema());
        assert_eq!(peer.name, "r1");
        assert_eq!(peer.asn, 0);
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0],
            FieldError::new("asn", 1, FieldErrorKind::InvalidInteger("x".to_string()))
        );
        assert_eq!(
            errors[1],
            FieldError::new("up", 2, FieldErrorKind::TypeMismatch("integer"))
        );
    }

    #[test]
    fn test_short_line() {
        let (peer, errors) = decode_record::<Peer>(&["r1"], &schema());
        assert_eq!(peer.name, "r1");
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.is_missing()));
        assert_eq!(
            errors.iter().map(|e| e.name).collect::<Vec<_>>(),
            vec!["asn", "up"]
        );
    }

    #[test]
    fn test_extra_columns_ignored() {
        let (peer, errors) = decode_record::<Peer>(&["r1", "7", "", "extra"], &schema());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].name, "up");
        assert_eq!(peer.asn, 7);
    }
}
