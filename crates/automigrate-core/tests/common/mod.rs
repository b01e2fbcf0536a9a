#![allow(dead_code)]

use automigrate_core::prelude::*;

/// Applies an operation to a snapshot the way a database would.
pub fn apply(snapshot: &mut TableSnapshot, op: &DdlOperation) {
    match op {
        DdlOperation::CreateTable { key, .. } => {
            assert!(!snapshot.exists, "table created twice");
            snapshot.exists = true;
            snapshot.insert_column(key.clone(), false);
        }
        DdlOperation::AddColumn { column, .. } => {
            assert!(
                !snapshot.has_column(&column.name),
                "column {} added twice",
                column.name
            );
            snapshot.insert_column(column.name.clone(), !column.required);
        }
        DdlOperation::AlterNullability {
            column, nullable, ..
        } => {
            assert!(snapshot.has_column(&column.name));
            if *nullable {
                snapshot.nullable_columns.insert(column.name.clone());
            } else {
                snapshot.nullable_columns.remove(&column.name);
            }
        }
        DdlOperation::DropColumn { column, .. } => {
            assert!(snapshot.columns.remove(column), "missing column {column}");
            snapshot.nullable_columns.remove(column);
        }
    }
}

/// Plans against `snapshot`, applies the plan, and returns it.
pub fn converge(
    schema: &RecordSchema,
    snapshot: &mut TableSnapshot,
    dialect: &dyn MigrationDialect,
) -> Vec<DdlOperation> {
    let desired = extract(schema, dialect).unwrap_or_else(|e| panic!("extract failed: {e}"));
    let ops = plan(&schema.table, &desired, snapshot, dialect);
    for op in &ops {
        apply(snapshot, op);
    }
    ops
}

/// Sorted column names of a snapshot.
pub fn columns(snapshot: &TableSnapshot) -> Vec<&str> {
    snapshot.columns.iter().map(String::as_str).collect()
}
