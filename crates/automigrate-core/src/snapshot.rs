//! Physical table state captured by introspection.

use std::collections::BTreeSet;

/// The state of one table at the instant it was introspected.
///
/// Snapshots are not kept past a reconciliation call; a concurrent
/// schema change after the snapshot is not detected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSnapshot {
    /// Whether the table exists.
    pub exists: bool,
    /// Names of all columns.
    pub columns: BTreeSet<String>,
    /// Names of the columns that accept NULL.
    pub nullable_columns: BTreeSet<String>,
}

impl TableSnapshot {
    /// A table that does not exist.
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }

    /// An existing table with no columns yet recorded.
    #[must_use]
    pub fn existing() -> Self {
        Self {
            exists: true,
            ..Self::default()
        }
    }

    /// Records a column.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, nullable: bool) -> Self {
        self.insert_column(name, nullable);
        self
    }

    /// Records a column in place.
    pub fn insert_column(&mut self, name: impl Into<String>, nullable: bool) {
        let name = name.into();
        if nullable {
            self.nullable_columns.insert(name.clone());
        }
        self.columns.insert(name);
    }

    /// Returns `true` if the column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    /// Returns `true` if the column exists and accepts NULL.
    #[must_use]
    pub fn is_nullable(&self, name: &str) -> bool {
        self.nullable_columns.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_is_empty() {
        let snap = TableSnapshot::absent();
        assert!(!snap.exists);
        assert!(snap.columns.is_empty());
    }

    #[test]
    fn columns_track_nullability() {
        let snap = TableSnapshot::existing()
            .with_column("Id", false)
            .with_column("Email", true);
        assert!(snap.has_column("Id"));
        assert!(!snap.is_nullable("Id"));
        assert!(snap.is_nullable("Email"));
        assert!(!snap.has_column("email"));
    }
}
