//! Column type mapping, loaded from a JSON document.
//!
//! The mapping is an optional JSON object of `"column": "TYPE_NAME"` entries:
//!
//! ```json
//! { "id": "INT64", "name": "STRING", "score": "FLOAT64", "signup": "TIMESTAMP" }
//! ```
//!
//! Columns absent from the mapping keep their textual form
//! ([`crate::types::DataType::String`]).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ImportResult;
use crate::types::DataType;

/// Column name → target type lookup used to coerce CSV cells before insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMapping {
    types: BTreeMap<String, DataType>,
}

impl TypeMapping {
    /// Create an empty mapping (every column stays a string).
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a mapping from a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> ImportResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse a mapping from a JSON object of `"column": "TYPE_NAME"` entries.
    ///
    /// Unknown type names are an error; see [`DataType::parse`] for the
    /// accepted names and aliases.
    pub fn from_json_str(input: &str) -> ImportResult<Self> {
        let types: BTreeMap<String, DataType> = serde_json::from_str(input)?;
        Ok(Self { types })
    }

    /// Add or replace a column type, chainable for programmatic construction.
    pub fn with(mut self, column: impl Into<String>, data_type: DataType) -> Self {
        self.types.insert(column.into(), data_type);
        self
    }

    /// Target type for a column. Unmapped columns default to `String`.
    pub fn type_for(&self, column: &str) -> DataType {
        self.types.get(column).copied().unwrap_or(DataType::String)
    }

    /// Iterate mapped column names.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Number of mapped columns.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
