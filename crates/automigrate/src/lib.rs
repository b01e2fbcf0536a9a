//! Keep SQL Server and SQLite tables converged with Rust record types.
//!
//! Declare a record once and let `automigrate` create its table and
//! keep it in shape at startup, with no migration files:
//!
//! - missing tables are created with their key column
//! - missing columns are added
//! - text columns follow their `required` marker (SQL Server only)
//! - columns the record no longer declares are **dropped**
//!
//! There is no history and no rollback. Every call converges the table
//! from whatever state it is in, and a converged table is left alone.
//!
//! # Example
//!
//! `#[derive(Record)]` expands to paths under `automigrate_core`, so
//! the application depends on both crates.
//!
//! ```rust,ignore
//! use automigrate::prelude::*;
//!
//! #[derive(Record)]
//! #[record(table = "People")]
//! struct Person {
//!     #[column(key, name = "Id")]
//!     id: i32,
//!     #[column(required, name = "Name")]
//!     name: String,
//!     #[column(name = "Age")]
//!     age: i32,
//! }
//!
//! let people = DataContext::<Person>::register(
//!     "Data Source=app.db;Cache=Shared",
//!     DialectKind::Sqlite,
//! )
//! .await?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Show the DDL a schema file needs, without executing it
//! automigrate --dialect sqlite --connection "Data Source=app.db" plan --schema person.json
//!
//! # Converge the table
//! automigrate --dialect sqlite --connection "Data Source=app.db" apply --schema person.json
//!
//! # Show a table's columns
//! automigrate --dialect sqlite --connection "Data Source=app.db" inspect --table People
//! ```

pub mod backend;
pub mod context;
pub mod error;
pub mod reconcile;
pub mod schema_file;

pub use automigrate_derive::Record;
pub use context::{DataContext, Repository};
pub use error::{MigrateError, Result};
pub use reconcile::{
    ensure_record, ensure_table, ensure_table_blocking, ReconcileReport, Reconciler,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::context::{DataContext, Repository};
    pub use crate::error::{MigrateError, Result};
    pub use crate::reconcile::{
        ensure_record, ensure_table, ensure_table_blocking, ReconcileReport, Reconciler,
    };
    pub use crate::schema_file::SchemaFile;
    pub use automigrate_core::prelude::*;
    pub use automigrate_derive::Record;
}
