//! Batch writers.
//!
//! A [`BatchWriter`] receives the [`crate::types::Batch`]es produced by the
//! pipeline and submits each one as a unit. Writers do not retry and do not
//! recover from partial failures; a failed write surfaces to the caller.
//!
//! Implementations:
//!
//! - [`MemoryWriter`]: collects batches in memory (tests, dry runs)
//! - `SpannerWriter` (cargo feature `spanner`): inserts into a Cloud Spanner
//!   table via the client SDK

pub mod memory;
#[cfg(feature = "spanner")]
pub mod spanner;

pub use memory::MemoryWriter;
#[cfg(feature = "spanner")]
pub use spanner::{database_path, SpannerWriter};

use crate::error::ImportResult;
use crate::types::Batch;

/// Destination seam for the import pipeline.
pub trait BatchWriter {
    /// Submit one batch as a unit.
    ///
    /// The batch's columns are in CSV header order and by contract match the
    /// destination table. Errors surface unmodified; batches already written
    /// are not rolled back.
    fn write_batch(&mut self, batch: &Batch) -> ImportResult<()>;

    /// Human-readable description of the destination, used in observer
    /// context and log lines.
    fn destination(&self) -> String;
}
