//! Identifier validation and quoting.
//!
//! Table and column names are embedded into DDL text, never bound as
//! parameters, so every name is checked against a conservative
//! character set before it is quoted.

use crate::error::{Result, SchemaError};

/// SQL Server's limit; SQLite has none.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Checks that `name` is `[A-Za-z_][A-Za-z0-9_]*` and at most
/// [`MAX_IDENTIFIER_LENGTH`] bytes long.
///
/// # Errors
///
/// [`SchemaError::InvalidIdentifier`] describing the first violation.
pub fn validate_identifier(name: &str) -> Result<()> {
    let invalid = |reason| {
        Err(SchemaError::InvalidIdentifier {
            name: name.to_string(),
            reason,
        })
    };

    let Some(first) = name.chars().next() else {
        return invalid("identifier is empty");
    };
    if name.len() > MAX_IDENTIFIER_LENGTH {
        return invalid("identifier exceeds 128 characters");
    }
    if !(first.is_ascii_alphabetic() || first == '_') {
        return invalid("identifier must start with a letter or underscore");
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return invalid("identifier may only contain letters, digits and underscores");
    }
    Ok(())
}

/// Validates and wraps `name` in square brackets.
///
/// # Errors
///
/// See [`validate_identifier`].
pub fn quote_bracketed(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("[{}]", name.replace(']', "]]")))
}

/// Validates and wraps `name` in double quotes.
///
/// # Errors
///
/// See [`validate_identifier`].
pub fn quote_double(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        for name in ["People", "_tmp", "Column_2", "a"] {
            assert!(validate_identifier(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_unsafe_names() {
        for name in [
            "",
            "2fast",
            "drop table",
            "x; DROP TABLE People",
            "a]b",
            "quo\"te",
            "nul\0",
            "Ünïcode",
        ] {
            assert!(
                matches!(
                    validate_identifier(name),
                    Err(SchemaError::InvalidIdentifier { .. })
                ),
                "{name:?}"
            );
        }
    }

    #[test]
    fn rejects_overlong_names() {
        let name = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert!(validate_identifier(&name).is_err());
        assert!(validate_identifier(&name[1..]).is_ok());
    }

    #[test]
    fn quoting_styles() {
        assert_eq!(quote_bracketed("People").unwrap(), "[People]");
        assert_eq!(quote_double("People").unwrap(), "\"People\"");
        assert!(quote_double("bad name").is_err());
    }
}
