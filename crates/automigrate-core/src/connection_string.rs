//! Connection-string scanning.
//!
//! Connection strings are `key=value` pairs separated by `;`. Keys
//! match case-sensitively, the first occurrence wins, and values are
//! trimmed. Anything after the first `=` belongs to the value.

use crate::error::{Result, SchemaError};

/// Returns the trimmed value of the first `key=` pair, if any.
#[must_use]
pub fn value_of<'a>(connection_string: &'a str, key: &str) -> Option<&'a str> {
    connection_string
        .split(';')
        .filter_map(|segment| segment.split_once('='))
        .find(|(k, _)| k.trim() == key)
        .map(|(_, value)| value.trim())
}

/// Returns the first non-empty value among `keys`, tried in order.
///
/// # Errors
///
/// [`SchemaError::Configuration`] naming the keys when none is set.
pub fn require_any<'a>(connection_string: &'a str, keys: &[&str]) -> Result<&'a str> {
    keys.iter()
        .filter_map(|key| value_of(connection_string, key))
        .find(|value| !value.is_empty())
        .ok_or_else(|| SchemaError::Configuration {
            key: keys.join("' or '"),
        })
}

/// Settings scanned from a SQL Server connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlServerSettings {
    /// `Server`, else `Data Source`.
    pub server: String,
    /// `Database`.
    pub database: String,
}

impl SqlServerSettings {
    /// Scans the server and database names.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Configuration`] if either is missing.
    pub fn parse(connection_string: &str) -> Result<Self> {
        Ok(Self {
            server: require_any(connection_string, &["Server", "Data Source"])?.to_string(),
            database: require_any(connection_string, &["Database"])?.to_string(),
        })
    }
}

/// Settings scanned from a SQLite connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteSettings {
    /// `Data Source`, else `Filename`.
    pub data_source: String,
}

impl SqliteSettings {
    /// In-memory database marker.
    pub const MEMORY: &'static str = ":memory:";

    /// Scans the data source.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Configuration`] if neither key is present.
    pub fn parse(connection_string: &str) -> Result<Self> {
        Ok(Self {
            data_source: require_any(connection_string, &["Data Source", "Filename"])?
                .to_string(),
        })
    }

    /// Returns `true` for `:memory:` databases.
    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.data_source == Self::MEMORY
    }
}
