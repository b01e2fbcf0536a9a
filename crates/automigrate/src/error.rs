//! Error types for table reconciliation.

use std::path::PathBuf;

use automigrate_core::SchemaError;

/// Boxed driver error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while ensuring a table.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// Configuration, metadata or identifier error; nothing was executed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The database could not be reached.
    #[error("Could not connect to the {dialect} database: {source}")]
    Connection {
        /// Dialect name.
        dialect: &'static str,
        /// Driver error.
        #[source]
        source: BoxError,
    },

    /// A DDL statement failed; earlier statements stay applied.
    #[error("DDL statement failed: {statement}: {source}")]
    DdlExecution {
        /// The failing statement.
        statement: String,
        /// Driver error.
        #[source]
        source: BoxError,
    },

    /// Failed to read a schema file.
    #[error("Invalid schema file '{path}': {message}")]
    SchemaFile {
        /// Path to the schema file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MigrateError {
    pub(crate) fn connection(
        dialect: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection {
            dialect,
            source: Box::new(source),
        }
    }

    pub(crate) fn ddl(
        statement: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::DdlExecution {
            statement: statement.to_string(),
            source: Box::new(source),
        }
    }
}

/// Result type for reconciliation.
pub type Result<T> = std::result::Result<T, MigrateError>;
