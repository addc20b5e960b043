//! `spanner-csv-loader` is a small library for loading CSV files into a Google
//! Cloud Spanner table, optionally in fixed-size chunks, with optional column
//! type coercion driven by a JSON mapping document.
//!
//! The primary entrypoint is [`pipeline::import_csv`], which reads a file
//! lazily (one pass, bounded memory when chunked) and submits each batch to a
//! [`writer::BatchWriter`]. The Spanner-backed writer lives behind the cargo
//! feature `spanner`; everything else — including the whole pipeline and the
//! in-memory writer — builds without it.
//!
//! ## What the pipeline does
//!
//! - **CSV reading**: headers are required; column names and order are taken
//!   from the header as-is and must match the destination table.
//! - **Chunking**: with a chunk size of `C` and `N` data rows the file yields
//!   `ceil(N/C)` batches, each with at most `C` rows (the last may be
//!   smaller). Without a chunk size the whole file is one batch.
//! - **Type coercion**: an optional [`schema::TypeMapping`] (loadable from a
//!   JSON file of `"column": "TYPE_NAME"` entries) coerces cells to
//!   [`types::DataType::Int64`], [`types::DataType::Float64`],
//!   [`types::DataType::Bool`], [`types::DataType::Timestamp`], or
//!   [`types::DataType::Date`]; unmapped columns stay
//!   [`types::DataType::String`]. Empty cells become [`types::Value::Null`].
//!   A coercion failure fails the whole batch with a row/column-addressed
//!   error.
//! - **Writing**: each batch is submitted as one unit. No retry, no partial
//!   failure recovery; re-running an import duplicates rows (plain inserts,
//!   no idempotence guarantee).
//!
//! ## Quick example: import into memory
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use spanner_csv_loader::pipeline::{import_csv, ImportOptions};
//! use spanner_csv_loader::schema::TypeMapping;
//! use spanner_csv_loader::types::DataType;
//! use spanner_csv_loader::writer::MemoryWriter;
//!
//! # fn main() -> Result<(), spanner_csv_loader::ImportError> {
//! let mapping = TypeMapping::new()
//!     .with("id", DataType::Int64)
//!     .with("score", DataType::Float64)
//!     .with("active", DataType::Bool)
//!     .with("signup", DataType::Timestamp);
//!
//! let opts = ImportOptions {
//!     chunk_size: NonZeroUsize::new(2),
//!     ..Default::default()
//! };
//!
//! let mut writer = MemoryWriter::new("people");
//! let stats = import_csv("tests/fixtures/people.csv", Some(&mapping), &mut writer, &opts)?;
//! println!("batches={} rows={}", stats.batches, stats.rows);
//! # Ok(())
//! # }
//! ```
//!
//! ## Observability (stderr logging + alert threshold)
//!
//! ```
//! use std::sync::Arc;
//!
//! use spanner_csv_loader::pipeline::{import_csv, ImportOptions, ImportSeverity, StdErrObserver};
//! use spanner_csv_loader::writer::MemoryWriter;
//!
//! let opts = ImportOptions {
//!     observer: Some(Arc::new(StdErrObserver)),
//!     alert_at_or_above: ImportSeverity::Critical,
//!     ..Default::default()
//! };
//!
//! // Missing files are treated as Critical and will trigger `on_alert` at this threshold.
//! let mut writer = MemoryWriter::new("people");
//! let _err = import_csv("does_not_exist.csv", None, &mut writer, &opts).unwrap_err();
//! ```
//!
//! ## Cloud Spanner
//!
//! Enable the `spanner` feature in your `Cargo.toml`:
//!
//! ```toml
//! spanner-csv-loader = { version = "0.1", features = ["spanner"] }
//! ```
//!
//! then see [`writer`] (`SpannerWriter`, `import_csv_to_spanner`). The writer
//! takes an already-authenticated SDK client; credential handling stays with
//! the caller.
//!
//! ## Modules
//!
//! - [`pipeline`]: CSV-to-batch reader, import orchestration, observers
//! - [`schema`]: JSON column-type mapping
//! - [`writer`]: batch writer trait + in-memory and Spanner implementations
//! - [`types`]: column types, cell values, batches
//! - [`error`]: error types used across the loader

pub mod error;
pub mod pipeline;
pub mod schema;
pub mod types;
pub mod writer;

pub use error::{ImportError, ImportResult};
