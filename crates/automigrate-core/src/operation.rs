//! DDL operations produced by the diff engine.

use std::fmt;

use crate::descriptor::FieldDescriptor;

/// A single schema change against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DdlOperation {
    /// Create the table with only its key column.
    CreateTable {
        /// Table name.
        table: String,
        /// Key column name.
        key: String,
    },
    /// Add a column.
    AddColumn {
        /// Table name.
        table: String,
        /// The column to add.
        column: FieldDescriptor,
    },
    /// Change whether a column accepts NULL.
    AlterNullability {
        /// Table name.
        table: String,
        /// The column, with its desired kind.
        column: FieldDescriptor,
        /// Target state.
        nullable: bool,
    },
    /// Drop a column.
    DropColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },
}

impl DdlOperation {
    /// The table this operation touches.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::CreateTable { table, .. }
            | Self::AddColumn { table, .. }
            | Self::AlterNullability { table, .. }
            | Self::DropColumn { table, .. } => table,
        }
    }

    /// Returns `true` if the operation can lose data.
    #[must_use]
    pub const fn is_destructive(&self) -> bool {
        matches!(self, Self::DropColumn { .. })
    }
}

impl fmt::Display for DdlOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTable { table, key } => write!(f, "create {table} (key {key})"),
            Self::AddColumn { table, column } => {
                write!(f, "add {table}.{} {}", column.name, column.kind)?;
                if column.required {
                    f.write_str(" not null")?;
                }
                Ok(())
            }
            Self::AlterNullability {
                table,
                column,
                nullable,
            } => {
                let state = if *nullable { "null" } else { "not null" };
                write!(f, "alter {table}.{} {state}", column.name)
            }
            Self::DropColumn { table, column } => write!(f, "drop {table}.{column}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ColumnKind;

    #[test]
    fn display_is_compact() {
        let op = DdlOperation::AddColumn {
            table: "People".into(),
            column: FieldDescriptor {
                name: "Age".into(),
                kind: ColumnKind::Integer,
                required: true,
                is_key: false,
            },
        };
        assert_eq!(op.to_string(), "add People.Age integer not null");
        assert_eq!(op.table(), "People");
        assert!(!op.is_destructive());
    }

    #[test]
    fn drop_is_destructive() {
        let op = DdlOperation::DropColumn {
            table: "People".into(),
            column: "Legacy".into(),
        };
        assert!(op.is_destructive());
        assert_eq!(op.to_string(), "drop People.Legacy");
    }
}
