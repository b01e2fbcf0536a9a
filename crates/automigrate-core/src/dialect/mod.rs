//! Dialect-specific DDL generation.
//!
//! The diff engine is written once against [`MigrationDialect`]. A
//! dialect supplies its type literals, key column syntax and a few
//! capability flags; the provided methods render every
//! [`DdlOperation`] from those.

mod sqlite;
mod sqlserver;

use std::fmt;
use std::str::FromStr;

pub use sqlite::SqliteDialect;
pub use sqlserver::SqlServerDialect;

use crate::descriptor::FieldDescriptor;
use crate::error::{Result, SchemaError};
use crate::identifier::quote_double;
use crate::kind::{map_kind, ColumnKind, SemanticType};
use crate::operation::DdlOperation;

/// Capability profile and DDL renderer of one SQL engine.
pub trait MigrationDialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Column kind used for dates and times.
    fn timestamp_kind(&self) -> ColumnKind {
        ColumnKind::Timestamp
    }

    /// Maps a semantic type to this dialect's column kind.
    fn map_kind(&self, ty: SemanticType) -> ColumnKind {
        map_kind(ty, self.timestamp_kind())
    }

    /// SQL type literal for a column kind, `None` for `Undefined`.
    fn column_type(&self, kind: ColumnKind) -> Option<&'static str>;

    /// Type and constraints of the key column in `CREATE TABLE`.
    fn key_column_definition(&self) -> &'static str;

    /// Whether `ALTER COLUMN ... NULL/NOT NULL` is available.
    fn supports_alter_nullability(&self) -> bool {
        false
    }

    /// Whether `CREATE TABLE IF NOT EXISTS` is available.
    fn supports_if_not_exists(&self) -> bool {
        false
    }

    /// Keyword between the table name and the column in `ADD`.
    fn add_column_keyword(&self) -> &'static str {
        "ADD COLUMN"
    }

    /// Literal default given to a NOT NULL column added to an existing
    /// table, for engines that reject the statement without one.
    fn not_null_default(&self, _kind: ColumnKind) -> Option<&'static str> {
        None
    }

    /// Validates and quotes an identifier.
    ///
    /// # Errors
    ///
    /// [`SchemaError::InvalidIdentifier`] for unsafe names.
    fn quote_identifier(&self, name: &str) -> Result<String> {
        quote_double(name)
    }

    /// Generates SQL for an operation.
    ///
    /// # Errors
    ///
    /// Fails on unsafe identifiers or unmapped column kinds.
    fn generate_sql(&self, operation: &DdlOperation) -> Result<String> {
        match operation {
            DdlOperation::CreateTable { table, key } => self.create_table(table, key),
            DdlOperation::AddColumn { table, column } => self.add_column(table, column),
            DdlOperation::AlterNullability {
                table,
                column,
                nullable,
            } => self.alter_nullability(table, column, *nullable),
            DdlOperation::DropColumn { table, column } => self.drop_column(table, column),
        }
    }

    /// Generates SQL for CREATE TABLE with only the key column.
    ///
    /// # Errors
    ///
    /// Fails on unsafe identifiers.
    fn create_table(&self, table: &str, key: &str) -> Result<String> {
        let mut sql = String::from("CREATE TABLE ");
        if self.supports_if_not_exists() {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&self.quote_identifier(table)?);
        sql.push_str(" (");
        sql.push_str(&self.quote_identifier(key)?);
        sql.push(' ');
        sql.push_str(self.key_column_definition());
        sql.push(')');
        Ok(sql)
    }

    /// Generates SQL for ADD COLUMN.
    ///
    /// # Errors
    ///
    /// Fails on unsafe identifiers or unmapped column kinds.
    fn add_column(&self, table: &str, column: &FieldDescriptor) -> Result<String> {
        let mut sql = format!(
            "ALTER TABLE {} {} {}",
            self.quote_identifier(table)?,
            self.add_column_keyword(),
            self.column_definition(column)?
        );
        if column.required {
            if let Some(default) = self.not_null_default(column.kind) {
                sql.push_str(" DEFAULT ");
                sql.push_str(default);
            }
        }
        Ok(sql)
    }

    /// Generates SQL for ALTER COLUMN ... NULL/NOT NULL.
    ///
    /// Dialects without the capability render a comment; the planner
    /// never emits the operation for them.
    ///
    /// # Errors
    ///
    /// Fails on unsafe identifiers or unmapped column kinds.
    fn alter_nullability(
        &self,
        table: &str,
        column: &FieldDescriptor,
        nullable: bool,
    ) -> Result<String> {
        if !self.supports_alter_nullability() {
            return Ok(format!(
                "-- {} does not support ALTER COLUMN NULL/NOT NULL for {}.{}",
                self.name(),
                table,
                column.name
            ));
        }
        let ty = self.sql_type(column)?;
        let null = if nullable { "NULL" } else { "NOT NULL" };
        Ok(format!(
            "ALTER TABLE {} ALTER COLUMN {} {ty} {null}",
            self.quote_identifier(table)?,
            self.quote_identifier(&column.name)?,
        ))
    }

    /// Generates SQL for DROP COLUMN.
    ///
    /// # Errors
    ///
    /// Fails on unsafe identifiers.
    fn drop_column(&self, table: &str, column: &str) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.quote_identifier(table)?,
            self.quote_identifier(column)?
        ))
    }

    /// Renders `<name> <type>[ NOT NULL]`.
    ///
    /// # Errors
    ///
    /// Fails on unsafe identifiers or unmapped column kinds.
    fn column_definition(&self, column: &FieldDescriptor) -> Result<String> {
        let mut sql = format!(
            "{} {}",
            self.quote_identifier(&column.name)?,
            self.sql_type(column)?
        );
        if column.required {
            sql.push_str(" NOT NULL");
        }
        Ok(sql)
    }

    /// Looks up the SQL type of a column.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnmappedColumn`] for `Undefined` kinds.
    fn sql_type(&self, column: &FieldDescriptor) -> Result<&'static str> {
        self.column_type(column.kind)
            .ok_or_else(|| SchemaError::UnmappedColumn {
                column: column.name.clone(),
                dialect: self.name(),
            })
    }
}

/// Runtime selection of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    /// Microsoft SQL Server.
    SqlServer,
    /// SQLite.
    Sqlite,
}

impl DialectKind {
    /// Returns the dialect implementation.
    #[must_use]
    pub fn dialect(self) -> &'static dyn MigrationDialect {
        match self {
            Self::SqlServer => &SqlServerDialect,
            Self::Sqlite => &SqliteDialect,
        }
    }

    /// Returns the dialect name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SqlServer => "sqlserver",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DialectKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlserver" | "sql-server" | "mssql" => Ok(Self::SqlServer),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(format!("unknown dialect '{s}'")),
        }
    }
}
