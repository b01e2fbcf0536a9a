//! SQL Server dialect.

use super::MigrationDialect;
use crate::error::Result;
use crate::identifier::quote_bracketed;
use crate::kind::ColumnKind;

/// SQL Server dialect for DDL generation.
///
/// Text is unbounded `NVARCHAR (MAX)` and the key is an identity
/// column. Nullability can be altered in place. Adding a NOT NULL
/// column to a table that already holds rows fails; no default is
/// supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDialect;

impl SqlServerDialect {
    /// Creates a new SQL Server dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MigrationDialect for SqlServerDialect {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn column_type(&self, kind: ColumnKind) -> Option<&'static str> {
        match kind {
            ColumnKind::Integer => Some("INTEGER"),
            ColumnKind::Text => Some("NVARCHAR (MAX)"),
            ColumnKind::Blob => Some("VARBINARY (MAX)"),
            ColumnKind::Real => Some("REAL"),
            ColumnKind::Numeric => Some("NUMERIC"),
            ColumnKind::Timestamp => Some("DATETIME2"),
            ColumnKind::Undefined => None,
        }
    }

    fn key_column_definition(&self) -> &'static str {
        "INTEGER PRIMARY KEY IDENTITY (1, 1) NOT NULL"
    }

    fn supports_alter_nullability(&self) -> bool {
        true
    }

    fn add_column_keyword(&self) -> &'static str {
        "ADD"
    }

    fn quote_identifier(&self, name: &str) -> Result<String> {
        quote_bracketed(name)
    }
}
