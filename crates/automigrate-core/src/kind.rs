//! Semantic field types and dialect-neutral column kinds.

use std::fmt;

/// Dialect-neutral storage class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Whole numbers.
    Integer,
    /// Character data.
    Text,
    /// Raw bytes.
    Blob,
    /// Floating point.
    Real,
    /// Booleans.
    Numeric,
    /// Date and time (server dialect only).
    Timestamp,
    /// No mapping; the field is left out of the table.
    Undefined,
}

impl ColumnKind {
    /// Returns `true` for kinds that produce a column.
    #[must_use]
    pub const fn is_defined(self) -> bool {
        !matches!(self, Self::Undefined)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Integer => "integer",
            Self::Text => "text",
            Self::Blob => "blob",
            Self::Real => "real",
            Self::Numeric => "numeric",
            Self::Timestamp => "timestamp",
            Self::Undefined => "undefined",
        };
        f.write_str(s)
    }
}

/// Runtime category of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// `String`, `&str`.
    Text,
    /// `u8`.
    Byte,
    /// 32-bit and narrower integers.
    Int,
    /// 64-bit integers.
    Long,
    /// `f32`.
    Float,
    /// `f64`.
    Double,
    /// `bool`.
    Bool,
    /// Dates, times and timestamps.
    DateTime,
    /// `Vec<u8>`.
    Bytes,
    /// Anything else.
    Other,
}

impl SemanticType {
    /// Whether a field of this type may be stored as NULL.
    ///
    /// Only text keeps the required/optional distinction; every other
    /// type is always emitted as NOT NULL.
    #[must_use]
    pub const fn honors_required(self) -> bool {
        matches!(self, Self::Text)
    }

    /// Parses the lowercase names used in schema files.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "text" | "string" => Self::Text,
            "byte" => Self::Byte,
            "int" => Self::Int,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            "bool" => Self::Bool,
            "datetime" => Self::DateTime,
            "bytes" => Self::Bytes,
            _ => Self::Other,
        }
    }
}

/// How a field's semantic type is known.
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    /// Resolved from the declared type.
    Known(SemanticType),
    /// Resolved at runtime by [`crate::probe::probe_type`].
    Probed(fn() -> SemanticType),
}

impl FieldType {
    /// Returns the semantic type, running the probe if needed.
    #[must_use]
    pub fn resolve(self) -> SemanticType {
        match self {
            Self::Known(ty) => ty,
            Self::Probed(probe) => probe(),
        }
    }
}

impl From<SemanticType> for FieldType {
    fn from(ty: SemanticType) -> Self {
        Self::Known(ty)
    }
}

/// Maps a semantic type to a column kind.
///
/// `timestamp` is the kind the active dialect stores dates in.
#[must_use]
pub const fn map_kind(ty: SemanticType, timestamp: ColumnKind) -> ColumnKind {
    match ty {
        SemanticType::Text => ColumnKind::Text,
        SemanticType::Byte | SemanticType::Int | SemanticType::Long => ColumnKind::Integer,
        SemanticType::Float | SemanticType::Double => ColumnKind::Real,
        SemanticType::Bool => ColumnKind::Numeric,
        SemanticType::DateTime => timestamp,
        SemanticType::Bytes => ColumnKind::Blob,
        SemanticType::Other => ColumnKind::Undefined,
    }
}
