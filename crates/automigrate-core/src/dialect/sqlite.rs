//! SQLite dialect.

use super::MigrationDialect;
use crate::kind::ColumnKind;

/// SQLite dialect for DDL generation.
///
/// Timestamps are stored as text. Nullability cannot be altered after
/// a column exists, so the planner never converges it here.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MigrationDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn timestamp_kind(&self) -> ColumnKind {
        ColumnKind::Text
    }

    fn column_type(&self, kind: ColumnKind) -> Option<&'static str> {
        // SQLite has dynamic typing with type affinity
        match kind {
            ColumnKind::Integer => Some("INTEGER"),
            ColumnKind::Text | ColumnKind::Timestamp => Some("TEXT"),
            ColumnKind::Blob => Some("BLOB"),
            ColumnKind::Real => Some("REAL"),
            ColumnKind::Numeric => Some("NUMERIC"),
            ColumnKind::Undefined => None,
        }
    }

    fn key_column_definition(&self) -> &'static str {
        "INTEGER PRIMARY KEY NOT NULL"
    }

    fn supports_if_not_exists(&self) -> bool {
        true
    }

    fn not_null_default(&self, kind: ColumnKind) -> Option<&'static str> {
        // ADD COLUMN ... NOT NULL is rejected without a non-null default.
        match kind {
            ColumnKind::Text | ColumnKind::Timestamp => Some("''"),
            ColumnKind::Integer | ColumnKind::Real | ColumnKind::Numeric => Some("0"),
            ColumnKind::Blob => Some("X''"),
            ColumnKind::Undefined => None,
        }
    }
}
