use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ImportError;

/// Severity classification used for observer callbacks and alerting thresholds.
///
/// The default is `Critical`, which as an alert threshold means "only alert on
/// infrastructure failures".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    #[default]
    Critical,
}

/// Context about an import attempt.
#[derive(Debug, Clone)]
pub struct ImportContext {
    /// The CSV path being imported.
    pub path: PathBuf,
    /// Description of the destination (see `BatchWriter::destination`).
    pub destination: String,
}

/// Per-batch progress reported while an import is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    /// 1-based batch position within the import.
    pub ordinal: usize,
    /// Rows in this batch.
    pub rows: usize,
}

/// Totals reported on successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportStats {
    /// Number of batches submitted.
    pub batches: usize,
    /// Total rows submitted.
    pub rows: usize,
}

/// Observer interface for import progress and outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ImportObserver: Send + Sync {
    /// Called for each batch, just before it is submitted to the writer.
    fn on_batch(&self, _ctx: &ImportContext, _batch: BatchStats) {}

    /// Called when the whole import succeeds.
    fn on_success(&self, _ctx: &ImportContext, _stats: ImportStats) {}

    /// Called when the import fails.
    fn on_failure(&self, _ctx: &ImportContext, _severity: ImportSeverity, _error: &ImportError) {}

    /// Called when an import failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ImportObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ImportObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ImportObserver for CompositeObserver {
    fn on_batch(&self, ctx: &ImportContext, batch: BatchStats) {
        for o in &self.observers {
            o.on_batch(ctx, batch);
        }
    }

    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs import events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ImportObserver for StdErrObserver {
    fn on_batch(&self, ctx: &ImportContext, batch: BatchStats) {
        eprintln!(
            "[import][batch {}] path={} dest={} rows={}",
            batch.ordinal,
            ctx.path.display(),
            ctx.destination,
            batch.rows
        );
    }

    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        eprintln!(
            "[import][ok] path={} dest={} batches={} rows={}",
            ctx.path.display(),
            ctx.destination,
            stats.batches,
            stats.rows
        );
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        eprintln!(
            "[import][{:?}] path={} dest={} err={}",
            severity,
            ctx.path.display(),
            ctx.destination,
            error
        );
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        eprintln!(
            "[ALERT][import][{:?}] path={} dest={} err={}",
            severity,
            ctx.path.display(),
            ctx.destination,
            error
        );
    }
}

/// Appends import events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ImportObserver for FileObserver {
    fn on_batch(&self, ctx: &ImportContext, batch: BatchStats) {
        self.append_line(&format!(
            "{} batch {} path={} dest={} rows={}",
            unix_ts(),
            batch.ordinal,
            ctx.path.display(),
            ctx.destination,
            batch.rows
        ));
    }

    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        self.append_line(&format!(
            "{} ok path={} dest={} batches={} rows={}",
            unix_ts(),
            ctx.path.display(),
            ctx.destination,
            stats.batches,
            stats.rows
        ));
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.append_line(&format!(
            "{} fail severity={:?} path={} dest={} err={}",
            unix_ts(),
            severity,
            ctx.path.display(),
            ctx.destination,
            error
        ));
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} path={} dest={} err={}",
            unix_ts(),
            severity,
            ctx.path.display(),
            ctx.destination,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
