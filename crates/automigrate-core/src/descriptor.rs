//! Field descriptor extraction.
//!
//! Turns a [`RecordSchema`] into the ordered column list the diff
//! engine converges towards. Descriptors are rebuilt on every call and
//! never cached.

use crate::dialect::MigrationDialect;
use crate::error::{Result, SchemaError};
use crate::kind::ColumnKind;
use crate::record::RecordSchema;

/// A column the record type wants in its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Column name.
    pub name: String,
    /// Mapped column kind; never [`ColumnKind::Undefined`].
    pub kind: ColumnKind,
    /// Emitted as NOT NULL.
    pub required: bool,
    /// The table's primary key.
    pub is_key: bool,
}

impl FieldDescriptor {
    /// Whether the column's nullability can be converged after creation.
    ///
    /// Only non-key text columns keep an optional/required distinction.
    #[must_use]
    pub fn nullability_tracked(&self) -> bool {
        !self.is_key && self.kind == ColumnKind::Text
    }
}

/// The desired shape of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredSchema {
    /// Name of the key column.
    pub key: String,
    /// All columns, key included, in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl DesiredSchema {
    /// Returns a column by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns `true` if the schema has a column with this name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Iterates over column names.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// Extracts the desired table shape from a record schema.
///
/// # Errors
///
/// [`SchemaError::NoKeyDefined`] or [`SchemaError::MultipleKeys`] when
/// the mapped fields do not carry exactly one key marker.
pub fn extract(schema: &RecordSchema, dialect: &dyn MigrationDialect) -> Result<DesiredSchema> {
    let mapped = schema.fields.iter().filter(|f| !f.not_mapped);

    let keys: Vec<&str> = mapped
        .clone()
        .filter(|f| f.key)
        .map(|f| f.name.as_ref())
        .collect();
    let key = match keys.as_slice() {
        [] => {
            return Err(SchemaError::NoKeyDefined {
                type_name: schema.type_name.to_string(),
            })
        }
        [key] => (*key).to_string(),
        _ => {
            return Err(SchemaError::MultipleKeys {
                type_name: schema.type_name.to_string(),
                fields: keys.iter().map(ToString::to_string).collect(),
            })
        }
    };

    let mut fields = Vec::new();
    for field in mapped {
        if field.key {
            // The key is always an integer identity column.
            fields.push(FieldDescriptor {
                name: key.clone(),
                kind: ColumnKind::Integer,
                required: true,
                is_key: true,
            });
            continue;
        }

        let ty = field.semantic_type();
        let kind = dialect.map_kind(ty);
        if !kind.is_defined() {
            continue;
        }
        fields.push(FieldDescriptor {
            name: field.name.to_string(),
            kind,
            required: !ty.honors_required() || field.required,
            is_key: false,
        });
    }

    Ok(DesiredSchema { key, fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{SqlServerDialect, SqliteDialect};
    use crate::kind::SemanticType;
    use crate::record::FieldDef;

    fn person() -> RecordSchema {
        RecordSchema::builder("Person", "People")
            .field(FieldDef::new("Id", SemanticType::Int).key())
            .field(FieldDef::new("Name", SemanticType::Text).required())
            .field(FieldDef::new("Nickname", SemanticType::Text))
            .field(FieldDef::new("Age", SemanticType::Int))
            .field(FieldDef::new("Born", SemanticType::DateTime))
            .build()
    }

    #[test]
    fn extracts_in_declaration_order() {
        let desired = extract(&person(), &SqlServerDialect::new()).unwrap();
        assert_eq!(desired.key, "Id");
        let names: Vec<_> = desired.column_names().collect();
        assert_eq!(names, vec!["Id", "Name", "Nickname", "Age", "Born"]);
    }

    #[test]
    fn key_is_required_integer() {
        let schema = RecordSchema::builder("Tag", "Tags")
            .field(FieldDef::new("Code", SemanticType::Text).key())
            .build();
        let desired = extract(&schema, &SqliteDialect::new()).unwrap();
        let key = desired.field("Code").unwrap();
        assert!(key.is_key);
        assert!(key.required);
        assert_eq!(key.kind, ColumnKind::Integer);
    }

    #[test]
    fn only_text_is_optional() {
        let desired = extract(&person(), &SqlServerDialect::new()).unwrap();
        assert!(desired.field("Name").unwrap().required);
        assert!(!desired.field("Nickname").unwrap().required);
        assert!(desired.field("Age").unwrap().required);
        assert!(desired.field("Born").unwrap().required);
    }

    #[test]
    fn timestamps_map_per_dialect() {
        let server = extract(&person(), &SqlServerDialect::new()).unwrap();
        let embedded = extract(&person(), &SqliteDialect::new()).unwrap();
        assert_eq!(server.field("Born").unwrap().kind, ColumnKind::Timestamp);
        assert_eq!(embedded.field("Born").unwrap().kind, ColumnKind::Text);
        // Stored as text, still never nullable.
        assert!(embedded.field("Born").unwrap().required);
    }

    #[test]
    fn not_mapped_fields_are_invisible() {
        let schema = RecordSchema::builder("Person", "People")
            .field(FieldDef::new("Id", SemanticType::Int).key())
            .field(FieldDef::new("Scratch", SemanticType::Text).not_mapped())
            .field(FieldDef::new("OldId", SemanticType::Int).key().not_mapped())
            .build();
        let desired = extract(&schema, &SqliteDialect::new()).unwrap();
        assert!(!desired.contains("Scratch"));
        assert!(!desired.contains("OldId"));
        assert_eq!(desired.fields.len(), 1);
    }

    #[test]
    fn undefined_kinds_are_dropped() {
        let schema = RecordSchema::builder("Person", "People")
            .field(FieldDef::new("Id", SemanticType::Int).key())
            .field(FieldDef::new("Tags", SemanticType::Other))
            .build();
        let desired = extract(&schema, &SqlServerDialect::new()).unwrap();
        assert!(!desired.contains("Tags"));
    }

    #[test]
    fn missing_key_fails() {
        let schema = RecordSchema::builder("Person", "People")
            .field(FieldDef::new("Name", SemanticType::Text))
            .build();
        let err = extract(&schema, &SqliteDialect::new()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::NoKeyDefined {
                type_name: "Person".into()
            }
        );
    }

    #[test]
    fn two_keys_fail() {
        let schema = RecordSchema::builder("Person", "People")
            .field(FieldDef::new("Id", SemanticType::Int).key())
            .field(FieldDef::new("Code", SemanticType::Int).key())
            .build();
        let err = extract(&schema, &SqliteDialect::new()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MultipleKeys {
                type_name: "Person".into(),
                fields: vec!["Id".into(), "Code".into()],
            }
        );
    }

    #[test]
    fn nullability_tracked_for_text_only() {
        let desired = extract(&person(), &SqlServerDialect::new()).unwrap();
        assert!(desired.field("Nickname").unwrap().nullability_tracked());
        assert!(!desired.field("Age").unwrap().nullability_tracked());
        assert!(!desired.field("Id").unwrap().nullability_tracked());
    }
}
