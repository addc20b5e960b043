//! Import orchestration.
//!
//! [`import_csv`] drives a [`BatchReader`] into any [`BatchWriter`], one batch
//! at a time:
//!
//! - with no chunk size, the whole file is submitted as a single batch
//! - with a chunk size, batches are submitted sequentially as they are read
//! - any CSV, coercion, or write error stops the import and surfaces to the
//!   caller (no retry, no rollback of batches already written)
//!
//! If an [`ImportObserver`] is provided, per-batch progress and the final
//! outcome are reported to it.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ImportError, ImportResult};
use crate::schema::TypeMapping;
use crate::writer::BatchWriter;

use super::observability::{
    BatchStats, ImportContext, ImportObserver, ImportSeverity, ImportStats,
};
use super::reader::BatchReader;

/// Options controlling an import run.
///
/// Use [`Default`] for common cases (single batch, no observer).
#[derive(Clone, Default)]
pub struct ImportOptions {
    /// Maximum rows per batch. `None` submits the whole file as one batch.
    pub chunk_size: Option<NonZeroUsize>,
    /// Optional observer for progress reporting and alerts.
    pub observer: Option<Arc<dyn ImportObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ImportSeverity,
}

impl fmt::Debug for ImportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportOptions")
            .field("chunk_size", &self.chunk_size)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

/// Import a CSV file into `writer`, optionally in chunks.
///
/// Re-running the same import without clearing the destination duplicates the
/// rows; the loader issues plain inserts and makes no idempotence guarantee.
///
/// # Examples
///
/// ```
/// use spanner_csv_loader::pipeline::{import_csv, ImportOptions};
/// use spanner_csv_loader::schema::TypeMapping;
/// use spanner_csv_loader::types::DataType;
/// use spanner_csv_loader::writer::MemoryWriter;
///
/// # fn main() -> Result<(), spanner_csv_loader::ImportError> {
/// let mapping = TypeMapping::new()
///     .with("id", DataType::Int64)
///     .with("score", DataType::Float64);
///
/// let mut writer = MemoryWriter::new("people");
/// let stats = import_csv(
///     "tests/fixtures/people.csv",
///     Some(&mapping),
///     &mut writer,
///     &ImportOptions::default(),
/// )?;
/// assert_eq!(stats.batches, 1);
/// # Ok(())
/// # }
/// ```
pub fn import_csv<W: BatchWriter>(
    path: impl AsRef<Path>,
    mapping: Option<&TypeMapping>,
    writer: &mut W,
    options: &ImportOptions,
) -> ImportResult<ImportStats> {
    let path = path.as_ref();
    let ctx = ImportContext {
        path: path.to_path_buf(),
        destination: writer.destination(),
    };

    let result = run_import(path, mapping, writer, options, &ctx);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(stats) => obs.on_success(&ctx, *stats),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn run_import<W: BatchWriter>(
    path: &Path,
    mapping: Option<&TypeMapping>,
    writer: &mut W,
    options: &ImportOptions,
    ctx: &ImportContext,
) -> ImportResult<ImportStats> {
    let reader = BatchReader::from_path(path, mapping, options.chunk_size)?;

    let mut stats = ImportStats::default();
    for batch in reader {
        let batch = batch?;
        if let Some(obs) = options.observer.as_ref() {
            obs.on_batch(
                ctx,
                BatchStats {
                    ordinal: batch.ordinal,
                    rows: batch.row_count(),
                },
            );
        }
        writer.write_batch(&batch)?;
        stats.batches += 1;
        stats.rows += batch.row_count();
    }
    Ok(stats)
}

/// Severity classification used for observer failure/alert callbacks.
pub(crate) fn severity_for_error(e: &ImportError) -> ImportSeverity {
    match e {
        ImportError::Io(_) => ImportSeverity::Critical,
        ImportError::Csv(err) => match err.kind() {
            csv::ErrorKind::Io(_) => ImportSeverity::Critical,
            _ => ImportSeverity::Error,
        },
        ImportError::Json(_) => ImportSeverity::Error,
        ImportError::SchemaMismatch { .. } => ImportSeverity::Error,
        ImportError::Parse { .. } => ImportSeverity::Error,
        #[cfg(feature = "spanner")]
        ImportError::Spanner(_) => ImportSeverity::Error,
    }
}
