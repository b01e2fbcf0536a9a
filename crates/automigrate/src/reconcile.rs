//! Table reconciliation.
//!
//! [`ensure_table`] is the single entry point: it checks the
//! connection string and the record metadata, opens one connection,
//! snapshots the table, and executes the planned DDL in order. Any
//! failure before the connection is opened means nothing was executed.
//! A failing statement aborts the call; statements that already ran
//! stay applied.

use automigrate_core::connection_string::{SqlServerSettings, SqliteSettings};
use automigrate_core::identifier::validate_identifier;
use automigrate_core::{
    extract, plan_sql, DesiredSchema, DialectKind, Record, RecordSchema, TableSnapshot,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::backend::{Backend, SqlServerBackend, SqliteBackend};
use crate::error::Result;

/// What a reconciliation did (or, in dry-run mode, would do).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Table name.
    pub table: String,
    /// Whether the table was absent when introspected.
    pub created: bool,
    /// Statements in execution order.
    pub statements: Vec<String>,
    /// Whether the statements were executed.
    pub executed: bool,
    /// When the table was introspected.
    pub checked_at: DateTime<Utc>,
}

impl ReconcileReport {
    /// Returns `true` if the table was already converged.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Converges tables against one dialect.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    dialect: DialectKind,
    dry_run: bool,
}

impl Reconciler {
    /// Creates a reconciler for `dialect`.
    #[must_use]
    pub const fn new(dialect: DialectKind) -> Self {
        Self {
            dialect,
            dry_run: false,
        }
    }

    /// Enables dry-run mode (SQL is planned but not executed).
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Returns the dialect.
    #[must_use]
    pub const fn dialect(&self) -> DialectKind {
        self.dialect
    }

    /// Converges `table` to `schema`.
    ///
    /// # Errors
    ///
    /// - [`MigrateError::Schema`](crate::MigrateError::Schema) for
    ///   connection-string, key or identifier problems; no connection
    ///   is opened
    /// - [`MigrateError::Connection`](crate::MigrateError::Connection)
    ///   if the database cannot be reached
    /// - [`MigrateError::DdlExecution`](crate::MigrateError::DdlExecution)
    ///   for the first failing statement
    pub async fn ensure_table(
        &self,
        schema: &RecordSchema,
        table: &str,
        connection_string: &str,
    ) -> Result<ReconcileReport> {
        let dialect = self.dialect.dialect();
        let desired = extract(schema, dialect)?;
        validate_identifier(table)?;

        info!(
            record = %schema.type_name,
            table = %table,
            dialect = %self.dialect,
            dry_run = self.dry_run,
            "Ensuring table"
        );

        match self.dialect {
            DialectKind::Sqlite => {
                let settings = SqliteSettings::parse(connection_string)?;
                let backend = SqliteBackend::connect(&settings, !self.dry_run).await?;
                self.converge(backend, table, &desired).await
            }
            DialectKind::SqlServer => {
                let settings = SqlServerSettings::parse(connection_string)?;
                let backend =
                    SqlServerBackend::connect(connection_string, &settings, !self.dry_run).await?;
                self.converge(backend, table, &desired).await
            }
        }
    }

    /// Converges the table of record type `R`.
    ///
    /// # Errors
    ///
    /// See [`Reconciler::ensure_table`].
    pub async fn ensure_record<R: Record>(&self, connection_string: &str) -> Result<ReconcileReport> {
        self.ensure_table(&R::schema(), R::TABLE, connection_string)
            .await
    }

    /// Reads the current state of `table` without changing anything.
    ///
    /// A database that does not exist yet reads as an absent table.
    ///
    /// # Errors
    ///
    /// Configuration and connection errors; introspection itself is
    /// fail-open.
    pub async fn inspect(&self, table: &str, connection_string: &str) -> Result<TableSnapshot> {
        match self.dialect {
            DialectKind::Sqlite => {
                let settings = SqliteSettings::parse(connection_string)?;
                let backend = SqliteBackend::connect(&settings, false).await?;
                Ok(read_snapshot(backend, table).await)
            }
            DialectKind::SqlServer => {
                let settings = SqlServerSettings::parse(connection_string)?;
                let backend = SqlServerBackend::connect(connection_string, &settings, false).await?;
                Ok(read_snapshot(backend, table).await)
            }
        }
    }

    async fn converge<B: Backend>(
        &self,
        backend: Option<B>,
        table: &str,
        desired: &DesiredSchema,
    ) -> Result<ReconcileReport> {
        match backend {
            Some(mut backend) => {
                let result = self.run(Some(&mut backend), table, desired).await;
                backend.close().await;
                result
            }
            None => self.run::<B>(None, table, desired).await,
        }
    }

    /// Plans against the table and executes unless in dry-run mode.
    ///
    /// `None` stands for a database that does not exist yet; only a
    /// dry run gets here without a connection.
    async fn run<B: Backend>(
        &self,
        mut backend: Option<&mut B>,
        table: &str,
        desired: &DesiredSchema,
    ) -> Result<ReconcileReport> {
        let current = match backend.as_deref_mut() {
            Some(backend) => backend.snapshot(table).await,
            None => TableSnapshot::absent(),
        };
        let checked_at = Utc::now();
        let statements = plan_sql(table, desired, &current, self.dialect.dialect())?;

        if statements.is_empty() {
            debug!(table = %table, "Table already converged");
        }

        if self.dry_run {
            for sql in &statements {
                info!(sql = %sql, "Dry run, not executing");
            }
        } else if let Some(backend) = backend {
            for sql in &statements {
                debug!(sql = %sql, "Executing DDL");
                backend.execute(sql).await?;
            }
        }

        info!(
            table = %table,
            created = !current.exists,
            statements = statements.len(),
            "Table reconciled"
        );

        Ok(ReconcileReport {
            table: table.to_string(),
            created: !current.exists,
            statements,
            executed: !self.dry_run,
            checked_at,
        })
    }
}

async fn read_snapshot<B: Backend>(backend: Option<B>, table: &str) -> TableSnapshot {
    let Some(mut backend) = backend else {
        return TableSnapshot::absent();
    };
    let snapshot = backend.snapshot(table).await;
    backend.close().await;
    snapshot
}

/// Ensures `table` matches `schema`.
///
/// # Errors
///
/// See [`Reconciler::ensure_table`].
pub async fn ensure_table(
    schema: &RecordSchema,
    table: &str,
    connection_string: &str,
    dialect: DialectKind,
) -> Result<()> {
    Reconciler::new(dialect)
        .ensure_table(schema, table, connection_string)
        .await
        .map(|_| ())
}

/// Ensures the table of record type `R` matches it.
///
/// # Errors
///
/// See [`Reconciler::ensure_table`].
pub async fn ensure_record<R: Record>(connection_string: &str, dialect: DialectKind) -> Result<()> {
    ensure_table(&R::schema(), R::TABLE, connection_string, dialect).await
}

/// Blocking variant of [`ensure_table`] for callers without a runtime.
///
/// Runs on a fresh current-thread Tokio runtime; do not call it from
/// inside an async context.
///
/// # Errors
///
/// See [`Reconciler::ensure_table`], plus [`MigrateError::Io`](crate::MigrateError::Io)
/// if the runtime cannot be built.
pub fn ensure_table_blocking(
    schema: &RecordSchema,
    table: &str,
    connection_string: &str,
    dialect: DialectKind,
) -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(ensure_table(schema, table, connection_string, dialect))
}
