//! Registration-time record schemas read from JSON.
//!
//! ```json
//! {
//!   "type_name": "Person",
//!   "table": "People",
//!   "fields": [
//!     { "name": "Id", "type": "int", "key": true },
//!     { "name": "Name", "type": "text", "required": true },
//!     { "name": "Age", "type": "int" }
//!   ]
//! }
//! ```
//!
//! `type` is one of `text`, `byte`, `int`, `long`, `float`, `double`,
//! `bool`, `datetime` or `bytes`; anything else leaves the field out
//! of the table.

use std::path::Path;

use automigrate_core::{FieldDef, RecordSchema, SemanticType};
use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};

/// A record schema as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Record type name.
    pub type_name: String,
    /// Table name; defaults to the type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldEntry>,
}

/// One field of a [`SchemaFile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    /// Field name.
    pub name: String,
    /// Semantic type name.
    #[serde(rename = "type")]
    pub ty: String,
    /// Primary key marker.
    #[serde(default)]
    pub key: bool,
    /// Required marker.
    #[serde(default)]
    pub required: bool,
    /// Excluded from the table.
    #[serde(default)]
    pub not_mapped: bool,
}

impl SchemaFile {
    /// Reads a schema file.
    ///
    /// # Errors
    ///
    /// [`MigrateError::Io`] if the file cannot be read,
    /// [`MigrateError::SchemaFile`] if it is not a valid schema.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents).map_err(|e| MigrateError::SchemaFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parses a schema from JSON text.
    ///
    /// # Errors
    ///
    /// [`MigrateError::Serialization`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the schema as pretty JSON.
    ///
    /// # Errors
    ///
    /// [`MigrateError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The table this schema maps to.
    #[must_use]
    pub fn table(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.type_name)
    }

    /// Converts to a [`RecordSchema`].
    #[must_use]
    pub fn to_record_schema(&self) -> RecordSchema {
        RecordSchema::builder(self.type_name.clone(), self.table().to_string())
            .fields(self.fields.iter().map(|entry| {
                let mut field = FieldDef::new(entry.name.clone(), SemanticType::from_name(&entry.ty))
                    .rust_type(entry.ty.clone());
                field.key = entry.key;
                field.required = entry.required;
                field.not_mapped = entry.not_mapped;
                field
            }))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE: &str = r#"{
        "type_name": "Person",
        "table": "People",
        "fields": [
            { "name": "Id", "type": "int", "key": true },
            { "name": "Name", "type": "text", "required": true },
            { "name": "Age", "type": "int" },
            { "name": "Scratch", "type": "text", "not_mapped": true }
        ]
    }"#;

    #[test]
    fn parses_people() {
        let file = SchemaFile::from_json(PEOPLE).unwrap();
        assert_eq!(file.table(), "People");
        let schema = file.to_record_schema();
        assert_eq!(schema.fields.len(), 4);
        assert!(schema.field("Id").unwrap().key);
        assert!(schema.field("Name").unwrap().required);
        assert!(schema.field("Scratch").unwrap().not_mapped);
        assert_eq!(
            schema.field("Age").unwrap().semantic_type(),
            SemanticType::Int
        );
    }

    #[test]
    fn table_defaults_to_type_name() {
        let file = SchemaFile::from_json(r#"{"type_name": "Tag", "fields": []}"#).unwrap();
        assert_eq!(file.table(), "Tag");
        assert_eq!(file.to_record_schema().table, "Tag");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            SchemaFile::from_json("{"),
            Err(MigrateError::Serialization(_))
        ));
    }

    #[test]
    fn load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[]").unwrap();
        let err = SchemaFile::load(&path).unwrap_err();
        assert!(matches!(err, MigrateError::SchemaFile { path: p, .. } if p == path));
    }

    #[test]
    fn json_round_trip_keeps_defaults_compact() {
        let file = SchemaFile::from_json(r#"{"type_name": "Tag", "fields": []}"#).unwrap();
        assert!(!file.to_json().unwrap().contains("table"));
    }
}
