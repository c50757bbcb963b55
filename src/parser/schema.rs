/*!
Versioned column layouts.

A layout is declared as an ascending chain of [SchemaStep]s. The first step is the base layout;
every later step lists the columns its version appends to the end of the previous layout.
Resolving a version walks the chain up to the greatest step not newer than the version, so an
older layout is always an exact prefix of a newer one.
*/
use crate::error::ParserError;
use crate::models::SchemaVersion;
use crate::parser::Coercer;
use std::ops::Range;

/// A field as declared in a schema step. Positions are assigned when the chain is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef<F> {
    pub field: F,
    pub name: &'static str,
    pub coercer: Coercer,
}

impl<F> FieldDef<F> {
    pub const fn new(field: F, name: &'static str, coercer: Coercer) -> Self {
        FieldDef {
            field,
            name,
            coercer,
        }
    }
}

/// Columns appended by schema version `since`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStep<F: 'static> {
    pub since: SchemaVersion,
    pub fields: &'static [FieldDef<F>],
}

/// A resolved field: which attribute, how to coerce it, and where its columns start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec<F> {
    pub field: F,
    pub name: &'static str,
    pub coercer: Coercer,
    pub position: usize,
}

impl<F> FieldSpec<F> {
    pub const fn width(&self) -> usize {
        self.coercer.width()
    }

    /// Raw column range consumed by this field.
    pub const fn columns(&self) -> Range<usize> {
        self.position..self.position + self.width()
    }
}

/// Ordered field layout for one schema version. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema<F> {
    version: SchemaVersion,
    fields: Vec<FieldSpec<F>>,
}

impl<F> Schema<F> {
    /// The threshold version this layout was resolved from.
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn fields(&self) -> &[FieldSpec<F>] {
        &self.fields
    }

    /// Number of logical fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of raw columns a complete record has.
    pub fn column_count(&self) -> usize {
        self.fields.last().map(|f| f.columns().end).unwrap_or(0)
    }

    /// Field names in column order.
    pub fn header_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec<F>> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Maps schema versions to field layouts.
///
/// Registries are plain `static` tables and can be shared between threads.
#[derive(Debug, Clone, Copy)]
pub struct SchemaRegistry<F: 'static> {
    steps: &'static [SchemaStep<F>],
}

impl<F: Copy> SchemaRegistry<F> {
    /// `steps` must be sorted by ascending `since`.
    pub const fn new(steps: &'static [SchemaStep<F>]) -> Self {
        SchemaRegistry { steps }
    }

    /// Versions at which the layout changes, in ascending order.
    pub fn thresholds(&self) -> Vec<SchemaVersion> {
        self.steps.iter().map(|s| s.since).collect()
    }

    /// Returns the layout of the greatest threshold not newer than `version`.
    ///
    /// A version older than every threshold resolves to the base layout. The only failure is a
    /// registry without any step.
    pub fn resolve(&self, version: SchemaVersion) -> Result<Schema<F>, ParserError> {
        let (base, newer) = self
            .steps
            .split_first()
            .ok_or(ParserError::UnresolvableSchema)?;

        let mut resolved = base.since;
        let mut fields = Vec::new();
        let mut position = 0;
        let steps = std::iter::once(base).chain(newer.iter().take_while(|s| s.since <= version));
        for step in steps {
            resolved = step.since;
            for def in step.fields {
                fields.push(FieldSpec {
                    field: def.field,
                    name: def.name,
                    coercer: def.coercer,
                    position,
                });
                position += def.coercer.width();
            }
        }

        Ok(Schema {
            version: resolved,
            fields,
        })
    }
}
