//! Cloud Spanner batch writer (feature-gated behind `spanner`).
//!
//! All wire-level work is delegated to the `google-cloud-spanner` client SDK.
//! Authentication and client construction are the caller's concern; this
//! module takes an already-built [`Client`].
//!
//! Each batch is submitted as one commit: one insert mutation per row, applied
//! together. Inserts are plain inserts (not insert-or-update), so re-running
//! an import duplicates rows unless the table has a primary key that rejects
//! them.
//!
//! ```no_run
//! use google_cloud_spanner::client::{Client, ClientConfig};
//! use spanner_csv_loader::pipeline::ImportOptions;
//! use spanner_csv_loader::schema::TypeMapping;
//! use spanner_csv_loader::writer::spanner::{database_path, import_csv_to_spanner, SpannerWriter};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::default().with_auth().await?;
//! let db = database_path("my-project", "my-instance", "my-database");
//! let client = Client::new(db, config).await?;
//!
//! let mapping = TypeMapping::from_json_path("people_types.json")?;
//! let writer = SpannerWriter::new(client, "people");
//! let stats = import_csv_to_spanner(
//!     "people.csv",
//!     Some(&mapping),
//!     &writer,
//!     &ImportOptions::default(),
//! )
//! .await?;
//! println!("inserted {} rows in {} batches", stats.rows, stats.batches);
//! writer.close().await;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use chrono::SecondsFormat;
use google_cloud_spanner::client::Client;
use google_cloud_spanner::mutation::insert;
use google_cloud_spanner::statement::ToKind;

use crate::error::ImportResult;
use crate::pipeline::import::severity_for_error;
use crate::pipeline::observability::{BatchStats, ImportContext, ImportStats};
use crate::pipeline::{BatchReader, ImportOptions};
use crate::schema::TypeMapping;
use crate::types::{Batch, Value};

/// Format the canonical Spanner database resource name.
pub fn database_path(project: &str, instance: &str, database: &str) -> String {
    format!("projects/{project}/instances/{instance}/databases/{database}")
}

/// Writes batches into a Cloud Spanner table.
pub struct SpannerWriter {
    client: Client,
    table: String,
}

impl SpannerWriter {
    /// Create a writer over an already-authenticated client and a table name.
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// Destination table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Description of the destination, used in observer context.
    pub fn destination(&self) -> String {
        format!("spanner:{}", self.table)
    }

    /// Submit one batch as a single commit (one insert mutation per row).
    ///
    /// A failed commit surfaces directly; previously committed batches are
    /// not rolled back.
    pub async fn write_batch(&self, batch: &Batch) -> ImportResult<()> {
        let columns: Vec<&str> = batch.columns.iter().map(String::as_str).collect();

        let mut mutations = Vec::with_capacity(batch.rows.len());
        for row in &batch.rows {
            let cells: Vec<Cell> = row.iter().map(Cell::from_value).collect();
            let values: Vec<&dyn ToKind> = cells.iter().map(Cell::as_to_kind).collect();
            mutations.push(insert(self.table.as_str(), &columns, &values));
        }

        self.client.apply(mutations).await?;
        Ok(())
    }

    /// Shut down the underlying client's session pool.
    pub async fn close(self) {
        self.client.close().await;
    }
}

/// Import a CSV file into a Cloud Spanner table, optionally in chunks.
///
/// Async counterpart of [`crate::pipeline::import_csv`]: batches are still
/// read and submitted strictly sequentially; the only concurrency is inside
/// the SDK's commit call.
pub async fn import_csv_to_spanner(
    path: impl AsRef<Path>,
    mapping: Option<&TypeMapping>,
    writer: &SpannerWriter,
    options: &ImportOptions,
) -> ImportResult<ImportStats> {
    let path = path.as_ref();
    let ctx = ImportContext {
        path: path.to_path_buf(),
        destination: writer.destination(),
    };

    let result = run_import(path, mapping, writer, options, &ctx).await;

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

async fn run_import(
    path: &Path,
    mapping: Option<&TypeMapping>,
    writer: &SpannerWriter,
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
        writer.write_batch(&batch).await?;
        stats.batches += 1;
        stats.rows += batch.row_count();
    }
    Ok(stats)
}

/// Owned cell representation handed to the SDK's mutation builder.
///
/// Timestamps and dates are sent in their Spanner wire form (RFC 3339 / ISO
/// date strings); the server types them against the column.
enum Cell {
    Null,
    Int64(i64),
    Float64(f64),
    Bool(bool),
    Text(String),
}

impl Cell {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Int64(v) => Cell::Int64(*v),
            Value::Float64(v) => Cell::Float64(*v),
            Value::Bool(v) => Cell::Bool(*v),
            Value::String(s) => Cell::Text(s.clone()),
            Value::Timestamp(ts) => Cell::Text(ts.to_rfc3339_opts(SecondsFormat::Nanos, true)),
            Value::Date(d) => Cell::Text(d.format("%Y-%m-%d").to_string()),
        }
    }

    fn as_to_kind(&self) -> &dyn ToKind {
        static NULL_CELL: Option<i64> = None;
        match self {
            Cell::Null => &NULL_CELL,
            Cell::Int64(v) => v,
            Cell::Float64(v) => v,
            Cell::Bool(v) => v,
            Cell::Text(s) => s,
        }
    }
}
