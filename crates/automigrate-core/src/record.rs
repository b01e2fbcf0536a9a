//! Static record metadata.
//!
//! A [`RecordSchema`] is the registration-time description of a record
//! type: its name, the table it lives in, and its fields with their
//! key/required/not-mapped markers. `#[derive(Record)]` generates one
//! as a constant; [`RecordSchema::builder`] assembles one by hand.

use std::borrow::Cow;

use crate::kind::{FieldType, SemanticType};

/// Metadata of a single record field.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name, used verbatim as column name.
    pub name: Cow<'static, str>,
    /// The declared type as written, for diagnostics.
    pub rust_type: Cow<'static, str>,
    /// How the semantic type is obtained.
    pub ty: FieldType,
    /// Marked `#[column(key)]`.
    pub key: bool,
    /// Marked `#[column(required)]`.
    pub required: bool,
    /// Marked `#[column(not_mapped)]`.
    pub not_mapped: bool,
}

impl FieldDef {
    /// Creates an optional, mapped, non-key field.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, ty: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            rust_type: Cow::Borrowed(""),
            ty: ty.into(),
            key: false,
            required: false,
            not_mapped: false,
        }
    }

    /// Marks the field as the record key.
    #[must_use]
    pub const fn key(mut self) -> Self {
        self.key = true;
        self
    }

    /// Marks the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Excludes the field from the table.
    #[must_use]
    pub const fn not_mapped(mut self) -> Self {
        self.not_mapped = true;
        self
    }

    /// Records the declared type.
    #[must_use]
    pub fn rust_type(mut self, rust_type: impl Into<Cow<'static, str>>) -> Self {
        self.rust_type = rust_type.into();
        self
    }

    /// Resolves the field's semantic type.
    #[must_use]
    pub fn semantic_type(&self) -> SemanticType {
        self.ty.resolve()
    }
}

/// Description of a record type and the table it maps to.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    /// Record type name, used in error messages.
    pub type_name: Cow<'static, str>,
    /// Default table name.
    pub table: Cow<'static, str>,
    /// Fields in declaration order.
    pub fields: Cow<'static, [FieldDef]>,
}

impl RecordSchema {
    /// Starts building a schema.
    #[must_use]
    pub fn builder(
        type_name: impl Into<Cow<'static, str>>,
        table: impl Into<Cow<'static, str>>,
    ) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            type_name: type_name.into(),
            table: table.into(),
            fields: Vec::new(),
        }
    }

    /// Returns a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of all fields not marked `not_mapped`.
    pub fn mapped_field_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| !f.not_mapped)
            .map(|f| f.name.as_ref())
    }
}

/// Builder for [`RecordSchema`].
#[derive(Debug, Clone)]
pub struct RecordSchemaBuilder {
    type_name: Cow<'static, str>,
    table: Cow<'static, str>,
    fields: Vec<FieldDef>,
}

impl RecordSchemaBuilder {
    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends several fields.
    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Finishes the schema.
    ///
    /// Key count is not checked here; see [`crate::descriptor::extract`].
    #[must_use]
    pub fn build(self) -> RecordSchema {
        RecordSchema {
            type_name: self.type_name,
            table: self.table,
            fields: Cow::Owned(self.fields),
        }
    }
}

/// A record type with static schema metadata.
///
/// Implemented by `#[derive(Record)]`.
pub trait Record {
    /// The record type name.
    const TYPE_NAME: &'static str;
    /// The table name.
    const TABLE: &'static str;
    /// Field metadata in declaration order.
    const FIELDS: &'static [FieldDef];

    /// Returns the record schema.
    #[must_use]
    fn schema() -> RecordSchema {
        RecordSchema {
            type_name: Cow::Borrowed(Self::TYPE_NAME),
            table: Cow::Borrowed(Self::TABLE),
            fields: Cow::Borrowed(Self::FIELDS),
        }
    }
}
