//! Core data model types for the loader.
//!
//! The pipeline turns CSV lines into [`Batch`]es of typed [`Value`]s. Column
//! types come from an optional [`crate::schema::TypeMapping`]; unmapped columns
//! stay textual.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

/// Logical column type for the destination table.
///
/// These are the scalar Cloud Spanner types the loader can coerce CSV text
/// into. Type names in a JSON mapping document are matched case-insensitively,
/// and a few common aliases are accepted (`integer`, `double`, `boolean`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer (`INT64`).
    Int64,
    /// 64-bit floating point number (`FLOAT64`).
    Float64,
    /// Boolean (`BOOL`).
    Bool,
    /// UTF-8 string (`STRING`). The default for unmapped columns.
    String,
    /// RFC 3339 timestamp (`TIMESTAMP`).
    Timestamp,
    /// Calendar date, `YYYY-MM-DD` (`DATE`).
    Date,
}

impl DataType {
    /// Parse a type name as it appears in a mapping document (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "int64" | "int" | "integer" => Some(Self::Int64),
            "float64" | "float" | "double" => Some(Self::Float64),
            "bool" | "boolean" => Some(Self::Bool),
            "string" | "text" | "utf8" => Some(Self::String),
            "timestamp" => Some(Self::Timestamp),
            "date" => Some(Self::Date),
            _ => None,
        }
    }

    /// Canonical Cloud Spanner name for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int64 => "INT64",
            Self::Float64 => "FLOAT64",
            Self::Bool => "BOOL",
            Self::String => "STRING",
            Self::Timestamp => "TIMESTAMP",
            Self::Date => "DATE",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for DataType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct TypeNameVisitor;

        impl serde::de::Visitor<'_> for TypeNameVisitor {
            type Value = DataType;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a column type name (INT64, FLOAT64, BOOL, STRING, TIMESTAMP, DATE)")
            }

            fn visit_str<E>(self, s: &str) -> Result<DataType, E>
            where
                E: serde::de::Error,
            {
                DataType::parse(s)
                    .ok_or_else(|| E::custom(format!("unknown column type '{s}'")))
            }
        }

        deserializer.deserialize_str(TypeNameVisitor)
    }
}

/// A single typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty cell.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    String(String),
    /// Timestamp (normalized to UTC).
    Timestamp(DateTime<Utc>),
    /// Calendar date.
    Date(NaiveDate),
}

/// A bounded group of rows submitted together to the destination table.
///
/// `columns` is taken from the CSV header in file order; by contract it must
/// match the destination table's column names and order. Each row holds one
/// [`Value`] per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// 1-based position of this batch within the import.
    pub ordinal: usize,
    /// Column names, in CSV header order.
    pub columns: Vec<String>,
    /// Row-major cell storage, at most `chunk_size` rows.
    pub rows: Vec<Vec<Value>>,
}

impl Batch {
    /// Number of rows in this batch.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
