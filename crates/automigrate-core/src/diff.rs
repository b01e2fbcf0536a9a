//! Diff and converge planning.
//!
//! Compares a [`DesiredSchema`] with a [`TableSnapshot`] and orders the
//! DDL needed to converge the table:
//!
//! 1. create the table with only its key column, if absent;
//! 2. add every desired column the table lacks;
//! 3. flip nullability of text columns whose required marker changed,
//!    when the dialect can;
//! 4. drop every column the record no longer declares.
//!
//! Later steps assume earlier ones committed. A converged table yields
//! an empty plan. Renamed fields show up as a drop plus an add; the
//! old column's data is lost.

use std::collections::BTreeSet;

use crate::descriptor::{DesiredSchema, FieldDescriptor};
use crate::dialect::MigrationDialect;
use crate::error::Result;
use crate::operation::DdlOperation;
use crate::snapshot::TableSnapshot;

/// The delta between a desired schema and a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDiff {
    /// Columns to add, in declaration order.
    pub columns_to_add: Vec<FieldDescriptor>,
    /// Columns to drop, in name order.
    pub columns_to_drop: Vec<String>,
    /// `(column, make_nullable)` pairs, in declaration order.
    pub nullability_flips: Vec<(String, bool)>,
}

impl SchemaDiff {
    /// Returns `true` if there are no column changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns_to_add.is_empty()
            && self.columns_to_drop.is_empty()
            && self.nullability_flips.is_empty()
    }

    /// Turns the diff into ordered operations on `table`.
    ///
    /// Nullability flips are dropped when the dialect cannot alter
    /// them.
    #[must_use]
    pub fn to_operations(
        &self,
        table: &str,
        desired: &DesiredSchema,
        dialect: &dyn MigrationDialect,
    ) -> Vec<DdlOperation> {
        let mut ops: Vec<DdlOperation> = self
            .columns_to_add
            .iter()
            .map(|column| DdlOperation::AddColumn {
                table: table.to_string(),
                column: column.clone(),
            })
            .collect();

        if dialect.supports_alter_nullability() {
            ops.extend(self.nullability_flips.iter().filter_map(|(name, nullable)| {
                desired
                    .field(name)
                    .map(|column| DdlOperation::AlterNullability {
                        table: table.to_string(),
                        column: column.clone(),
                        nullable: *nullable,
                    })
            }));
        }

        ops.extend(
            self.columns_to_drop
                .iter()
                .map(|column| DdlOperation::DropColumn {
                    table: table.to_string(),
                    column: column.clone(),
                }),
        );
        ops
    }
}

/// Computes the column delta between `desired` and `current`.
///
/// An absent table counts as holding just the key column, which its
/// creation supplies.
#[must_use]
pub fn diff(desired: &DesiredSchema, current: &TableSnapshot) -> SchemaDiff {
    let existing: BTreeSet<&str> = if current.exists {
        current.columns.iter().map(String::as_str).collect()
    } else {
        BTreeSet::from([desired.key.as_str()])
    };

    let columns_to_add = desired
        .fields
        .iter()
        .filter(|f| !existing.contains(f.name.as_str()))
        .cloned()
        .collect();

    let nullability_flips = desired
        .fields
        .iter()
        .filter(|f| f.nullability_tracked() && existing.contains(f.name.as_str()))
        .filter_map(|f| {
            let make_nullable = !f.required;
            (current.is_nullable(&f.name) != make_nullable).then(|| (f.name.clone(), make_nullable))
        })
        .collect();

    let columns_to_drop = existing
        .iter()
        .filter(|name| !desired.contains(name))
        .map(|name| (*name).to_string())
        .collect();

    SchemaDiff {
        columns_to_add,
        columns_to_drop,
        nullability_flips,
    }
}

/// Plans every operation needed to converge `table`.
#[must_use]
pub fn plan(
    table: &str,
    desired: &DesiredSchema,
    current: &TableSnapshot,
    dialect: &dyn MigrationDialect,
) -> Vec<DdlOperation> {
    let mut ops = Vec::new();
    if !current.exists {
        ops.push(DdlOperation::CreateTable {
            table: table.to_string(),
            key: desired.key.clone(),
        });
    }
    ops.extend(diff(desired, current).to_operations(table, desired, dialect));
    ops
}

/// Plans and renders every statement before any is executed.
///
/// # Errors
///
/// Fails on the first operation the dialect cannot render, so an
/// unsafe name rejects the whole plan.
pub fn plan_sql(
    table: &str,
    desired: &DesiredSchema,
    current: &TableSnapshot,
    dialect: &dyn MigrationDialect,
) -> Result<Vec<String>> {
    plan(table, desired, current, dialect)
        .iter()
        .map(|op| dialect.generate_sql(op))
        .collect()
}
