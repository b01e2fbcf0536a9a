//! SQL Server backend.

use automigrate_core::connection_string::SqlServerSettings;
use automigrate_core::identifier::quote_bracketed;
use automigrate_core::TableSnapshot;
use tiberius::{Client, Config};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, info};

use super::Backend;
use crate::error::{MigrateError, Result};

const DIALECT: &str = "sqlserver";

/// Resolves the name the same way the column query does, so a table of
/// the same name in another schema is not mistaken for this one.
const TABLE_EXISTS_SQL: &str =
    "SELECT CASE WHEN OBJECT_ID(@P1, 'U') IS NULL THEN 0 ELSE 1 END";

const COLUMNS_SQL: &str =
    "SELECT name, is_nullable FROM sys.columns WHERE object_id = OBJECT_ID(@P1, 'U')";

/// A single SQL Server connection.
pub struct SqlServerBackend {
    client: Client<Compat<TcpStream>>,
}

impl SqlServerBackend {
    /// Connects to the configured database.
    ///
    /// With `create` set a database the server does not have is created
    /// first through `master`; otherwise a missing database yields
    /// `None` and nothing is executed.
    ///
    /// # Errors
    ///
    /// [`MigrateError::Connection`] if the server cannot be reached or
    /// the connection string is rejected by the driver;
    /// [`MigrateError::DdlExecution`] if `CREATE DATABASE` fails.
    pub async fn connect(
        connection_string: &str,
        settings: &SqlServerSettings,
        create: bool,
    ) -> Result<Option<Self>> {
        let config = Config::from_ado_string(connection_string)
            .map_err(|e| MigrateError::connection(DIALECT, e))?;

        if !ensure_database(&config, &settings.database, create).await? {
            debug!(database = %settings.database, "SQL Server database does not exist");
            return Ok(None);
        }

        debug!(
            server = %settings.server,
            database = %settings.database,
            "Connecting to SQL Server"
        );
        let client = open(config)
            .await
            .map_err(|e| MigrateError::connection(DIALECT, e))?;
        Ok(Some(Self { client }))
    }
}

async fn open(config: Config) -> tiberius::Result<Client<Compat<TcpStream>>> {
    let tcp = TcpStream::connect(config.get_addr())
        .await
        .map_err(|e| tiberius::error::Error::Io {
            kind: e.kind(),
            message: e.to_string(),
        })?;
    tcp.set_nodelay(true).ok();
    Client::connect(config, tcp.compat_write()).await
}

/// Checks `database` through `master`, creating it when missing and
/// `create` is set. Returns whether the database exists afterwards.
async fn ensure_database(config: &Config, database: &str, create: bool) -> Result<bool> {
    let mut master = config.clone();
    master.database("master");
    let mut client = open(master)
        .await
        .map_err(|e| MigrateError::connection(DIALECT, e))?;

    let count: i32 = client
        .query(
            "SELECT COUNT(*) FROM sys.databases WHERE name = @P1",
            &[&database],
        )
        .await
        .map_err(|e| MigrateError::connection(DIALECT, e))?
        .into_row()
        .await
        .map_err(|e| MigrateError::connection(DIALECT, e))?
        .and_then(|row| row.get(0))
        .unwrap_or(0);

    let exists = count > 0;
    if !exists && create {
        let sql = format!("CREATE DATABASE {}", quote_bracketed(database)?);
        info!(database = %database, "Creating database");
        client
            .simple_query(sql.as_str())
            .await
            .map_err(|e| MigrateError::ddl(&sql, e))?
            .into_results()
            .await
            .map_err(|e| MigrateError::ddl(&sql, e))?;
    }

    if let Err(e) = client.close().await {
        debug!(error = %e, "Closing master connection failed");
    }
    Ok(exists || create)
}

impl Backend for SqlServerBackend {
    type IntrospectError = tiberius::error::Error;

    async fn try_snapshot(
        &mut self,
        table: &str,
    ) -> std::result::Result<TableSnapshot, tiberius::error::Error> {
        let tables: i32 = self
            .client
            .query(TABLE_EXISTS_SQL, &[&table])
            .await?
            .into_row()
            .await?
            .and_then(|row| row.get(0))
            .unwrap_or(0);
        if tables == 0 {
            return Ok(TableSnapshot::absent());
        }

        let rows = self
            .client
            .query(COLUMNS_SQL, &[&table])
            .await?
            .into_first_result()
            .await?;

        let mut snapshot = TableSnapshot::existing();
        for row in rows {
            let name: Option<&str> = row.get(0);
            let nullable: Option<bool> = row.get(1);
            if let Some(name) = name {
                snapshot.insert_column(name, nullable.unwrap_or(true));
            }
        }
        Ok(snapshot)
    }

    async fn execute(&mut self, sql: &str) -> Result<()> {
        self.client
            .simple_query(sql)
            .await
            .map_err(|e| MigrateError::ddl(sql, e))?
            .into_results()
            .await
            .map_err(|e| MigrateError::ddl(sql, e))?;
        Ok(())
    }

    async fn close(self) {
        if let Err(e) = self.client.close().await {
            debug!(error = %e, "Closing SQL Server connection failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_queries_resolve_the_same_object() {
        for sql in [TABLE_EXISTS_SQL, COLUMNS_SQL] {
            assert!(sql.contains("OBJECT_ID(@P1, 'U')"), "{sql}");
            assert!(!sql.contains("sys.tables"), "{sql}");
        }
    }
}
