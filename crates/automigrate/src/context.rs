//! Data-access handles.
//!
//! [`DataContext::register`] is the startup call an application makes
//! once per record type: it converges the record's table and hands
//! back a handle carrying the dialect, table and connection string.
//! Applications that put a repository in front of the table construct
//! it from the handle with [`DataContext::into_repository`].

use std::fmt;
use std::marker::PhantomData;

use automigrate_core::{DialectKind, Record};

use crate::error::Result;
use crate::reconcile::{ReconcileReport, Reconciler};

/// A converged table for record type `R`.
pub struct DataContext<R> {
    dialect: DialectKind,
    table: String,
    connection_string: String,
    report: ReconcileReport,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> DataContext<R> {
    /// Converges `R`'s table and returns a handle to it.
    ///
    /// # Errors
    ///
    /// See [`Reconciler::ensure_table`].
    pub async fn register(connection_string: impl Into<String>, dialect: DialectKind) -> Result<Self> {
        Self::register_as(R::TABLE, connection_string, dialect).await
    }

    /// Like [`DataContext::register`], with a table name other than
    /// the record's default.
    ///
    /// # Errors
    ///
    /// See [`Reconciler::ensure_table`].
    pub async fn register_as(
        table: impl Into<String>,
        connection_string: impl Into<String>,
        dialect: DialectKind,
    ) -> Result<Self> {
        let table = table.into();
        let connection_string = connection_string.into();
        let report = Reconciler::new(dialect)
            .ensure_table(&R::schema(), &table, &connection_string)
            .await?;
        Ok(Self {
            dialect,
            table,
            connection_string,
            report,
            _record: PhantomData,
        })
    }

    /// Wraps the handle in a repository.
    #[must_use]
    pub fn into_repository<P: Repository<R>>(self) -> P {
        P::from_context(self)
    }
}

impl<R> DataContext<R> {
    /// The dialect the table was converged with.
    #[must_use]
    pub const fn dialect(&self) -> DialectKind {
        self.dialect
    }

    /// The table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The connection string.
    #[must_use]
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// What registration changed.
    #[must_use]
    pub const fn report(&self) -> &ReconcileReport {
        &self.report
    }
}

impl<R> fmt::Debug for DataContext<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataContext")
            .field("dialect", &self.dialect)
            .field("table", &self.table)
            .field("statements", &self.report.statements.len())
            .finish_non_exhaustive()
    }
}

/// A repository built on top of a [`DataContext`].
pub trait Repository<R>: Sized {
    /// Builds the repository from a registered context.
    fn from_context(context: DataContext<R>) -> Self;
}
