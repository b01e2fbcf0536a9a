//! Error types for schema extraction and DDL generation.

/// Errors raised before any statement reaches the database.
///
/// Every variant is fatal for the reconciliation call that produced
/// it. Messages name the fix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A required connection-string key is missing or empty.
    #[error(
        "Connection string has no value for '{key}'! \
         Solution: add '{key}=<value>;' to the connection string"
    )]
    Configuration {
        /// The key (or alternatives) that was looked up.
        key: String,
    },

    /// The record type has no field marked as key.
    #[error(
        "No valid key in the record type '{type_name}'! \
         Solution: mark exactly one field with #[column(key)]"
    )]
    NoKeyDefined {
        /// Name of the record type.
        type_name: String,
    },

    /// The record type has more than one field marked as key.
    #[error(
        "Record type '{type_name}' marks {} fields as key ({}); only one key field is allowed! \
         Solution: keep #[column(key)] on a single field",
        fields.len(),
        fields.join(", ")
    )]
    MultipleKeys {
        /// Name of the record type.
        type_name: String,
        /// The offending fields, in declaration order.
        fields: Vec<String>,
    },

    /// A table or column name cannot be embedded into DDL.
    #[error("Invalid identifier {name:?}: {reason}")]
    InvalidIdentifier {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A column kind has no SQL type in the active dialect.
    #[error("Column '{column}' has no SQL type in the {dialect} dialect")]
    UnmappedColumn {
        /// Column name.
        column: String,
        /// Dialect name.
        dialect: &'static str,
    },
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_key_message_names_type_and_fix() {
        let err = SchemaError::NoKeyDefined {
            type_name: "Person".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Person"));
        assert!(msg.contains("#[column(key)]"));
    }

    #[test]
    fn multiple_keys_lists_fields() {
        let err = SchemaError::MultipleKeys {
            type_name: "Person".into(),
            fields: vec!["Id".into(), "Code".into()],
        };
        assert!(err.to_string().contains("2 fields as key (Id, Code)"));
    }

    #[test]
    fn configuration_names_missing_key() {
        let err = SchemaError::Configuration {
            key: "Database".into(),
        };
        assert!(err.to_string().contains("'Database=<value>;'"));
    }
}
