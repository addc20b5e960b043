use thiserror::Error;

/// Convenience result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Error type returned by the loader.
///
/// This is a single error enum shared across the CSV pipeline, the type-mapping
/// loader, and the batch writers. Errors propagate unmodified to the caller;
/// there is no retry policy and no partial-commit recovery.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading/parsing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The JSON type-mapping document is malformed (bad JSON, non-string
    /// values, or an unknown type name).
    #[error("type mapping error: {0}")]
    Json(#[from] serde_json::Error),

    /// The CSV header does not line up with the type mapping (e.g. the mapping
    /// names a column the file does not have).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A cell could not be coerced into the mapped [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    Parse {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    #[cfg(feature = "spanner")]
    /// Cloud Spanner client error (feature-gated behind `spanner`).
    #[error("spanner error: {0}")]
    Spanner(#[from] google_cloud_spanner::client::Error),
}
