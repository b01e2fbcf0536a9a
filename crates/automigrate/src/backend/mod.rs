//! Live database connections.
//!
//! A backend owns one connection for the duration of a single
//! reconciliation call. Introspection is fail-open: any error while
//! reading the catalog is logged and reported as an absent table, so a
//! first run can create it. That also means an existing table that
//! cannot be read looks absent; the subsequent `CREATE TABLE` then
//! fails on SQL Server or is a no-op on SQLite.

mod sqlite;
mod sqlserver;

pub use sqlite::SqliteBackend;
pub use sqlserver::SqlServerBackend;

use automigrate_core::TableSnapshot;
use tracing::warn;

use crate::error::Result;

/// A connection that can introspect and alter one table.
#[allow(async_fn_in_trait)]
pub trait Backend: Sized {
    /// Error returned by catalog queries.
    type IntrospectError: std::fmt::Display;

    /// Reads the table's existence, columns and nullable columns.
    async fn try_snapshot(
        &mut self,
        table: &str,
    ) -> std::result::Result<TableSnapshot, Self::IntrospectError>;

    /// Executes one DDL statement.
    async fn execute(&mut self, sql: &str) -> Result<()>;

    /// Closes the connection.
    async fn close(self);

    /// Reads the table, treating any failure as "absent".
    async fn snapshot(&mut self, table: &str) -> TableSnapshot {
        match self.try_snapshot(table).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    table = %table,
                    error = %e,
                    "Introspection failed, treating table as absent"
                );
                TableSnapshot::absent()
            }
        }
    }
}
