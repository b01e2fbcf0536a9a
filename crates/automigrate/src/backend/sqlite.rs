//! SQLite backend.

use std::str::FromStr;

use automigrate_core::connection_string::SqliteSettings;
use automigrate_core::TableSnapshot;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use tracing::debug;

use super::Backend;
use crate::error::{MigrateError, Result};

/// A single SQLite connection.
pub struct SqliteBackend {
    conn: SqliteConnection,
}

impl SqliteBackend {
    /// Opens the database file.
    ///
    /// With `create` set a missing file is created; otherwise a missing
    /// file yields `None` and nothing is written to disk.
    ///
    /// # Errors
    ///
    /// [`MigrateError::Connection`] if the file cannot be opened.
    pub async fn connect(settings: &SqliteSettings, create: bool) -> Result<Option<Self>> {
        if !create
            && !settings.is_memory()
            && !tokio::fs::try_exists(&settings.data_source).await?
        {
            debug!(data_source = %settings.data_source, "SQLite database does not exist");
            return Ok(None);
        }

        let options = if settings.is_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
        } else {
            Ok(SqliteConnectOptions::new().filename(&settings.data_source))
        }
        .map_err(|e| MigrateError::connection("sqlite", e))?
        .create_if_missing(create);

        debug!(data_source = %settings.data_source, "Opening SQLite database");
        let conn = SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| MigrateError::connection("sqlite", e))?;
        Ok(Some(Self { conn }))
    }

    /// Wraps an already open connection.
    #[must_use]
    pub const fn from_connection(conn: SqliteConnection) -> Self {
        Self { conn }
    }

    /// Returns the underlying connection.
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }
}

impl Backend for SqliteBackend {
    type IntrospectError = sqlx::Error;

    async fn try_snapshot(&mut self, table: &str) -> std::result::Result<TableSnapshot, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(&mut self.conn)
        .await?;
        if count == 0 {
            return Ok(TableSnapshot::absent());
        }

        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT name, \"notnull\" FROM pragma_table_info(?)")
                .bind(table)
                .fetch_all(&mut self.conn)
                .await?;

        let mut snapshot = TableSnapshot::existing();
        for (name, not_null) in rows {
            snapshot.insert_column(name, not_null == 0);
        }
        Ok(snapshot)
    }

    async fn execute(&mut self, sql: &str) -> Result<()> {
        sqlx::query(sql)
            .execute(&mut self.conn)
            .await
            .map_err(|e| MigrateError::ddl(sql, e))?;
        Ok(())
    }

    async fn close(self) {
        if let Err(e) = self.conn.close().await {
            debug!(error = %e, "Closing SQLite connection failed");
        }
    }
}
