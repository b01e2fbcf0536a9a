//! Driver-agnostic schema reconciliation engine.
//!
//! `automigrate-core` turns a record type into a desired column set,
//! compares it with a [`TableSnapshot`] read from a live table and
//! plans the DDL needed to converge the two. It knows nothing about
//! connections: drivers live in the `automigrate` crate.
//!
//! # Pipeline
//!
//! ```text
//! RecordSchema --extract--> DesiredSchema --+
//!                                           +--plan--> Vec<DdlOperation> --generate_sql--> DDL
//! live table ---snapshot--> TableSnapshot --+
//! ```
//!
//! - [`record`]: static field metadata, usually produced by
//!   `#[derive(Record)]`
//! - [`kind`] and [`probe`]: semantic type to column kind mapping
//! - [`descriptor`]: key detection and nullability policy
//! - [`diff`]: the converge algorithm
//! - [`dialect`]: SQL Server and SQLite DDL rendering
//! - [`connection_string`]: `key=value;` scanning
//!
//! # Example
//!
//! ```rust
//! use automigrate_core::prelude::*;
//!
//! let schema = RecordSchema::builder("Person", "People")
//!     .field(FieldDef::new("Id", SemanticType::Int).key())
//!     .field(FieldDef::new("Name", SemanticType::Text).required())
//!     .field(FieldDef::new("Age", SemanticType::Int))
//!     .build();
//!
//! let dialect = SqliteDialect::new();
//! let desired = extract(&schema, &dialect).unwrap();
//! let sql = plan_sql("People", &desired, &TableSnapshot::absent(), &dialect).unwrap();
//!
//! assert_eq!(
//!     sql[0],
//!     r#"CREATE TABLE IF NOT EXISTS "People" ("Id" INTEGER PRIMARY KEY NOT NULL)"#
//! );
//! assert_eq!(sql.len(), 3);
//! ```

pub mod connection_string;
pub mod descriptor;
pub mod dialect;
pub mod diff;
pub mod error;
pub mod identifier;
pub mod kind;
pub mod operation;
pub mod probe;
pub mod record;
pub mod snapshot;

pub use descriptor::{extract, DesiredSchema, FieldDescriptor};
pub use dialect::{DialectKind, MigrationDialect, SqlServerDialect, SqliteDialect};
pub use diff::{diff, plan, plan_sql, SchemaDiff};
pub use error::{Result, SchemaError};
pub use kind::{ColumnKind, FieldType, SemanticType};
pub use operation::DdlOperation;
pub use record::{FieldDef, Record, RecordSchema, RecordSchemaBuilder};
pub use snapshot::TableSnapshot;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::connection_string::{SqlServerSettings, SqliteSettings};
    pub use crate::descriptor::{extract, DesiredSchema, FieldDescriptor};
    pub use crate::dialect::{DialectKind, MigrationDialect, SqlServerDialect, SqliteDialect};
    pub use crate::diff::{diff, plan, plan_sql, SchemaDiff};
    pub use crate::error::{Result, SchemaError};
    pub use crate::kind::{ColumnKind, FieldType, SemanticType};
    pub use crate::operation::DdlOperation;
    pub use crate::record::{FieldDef, Record, RecordSchema};
    pub use crate::snapshot::TableSnapshot;
}
