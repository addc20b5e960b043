//! In-memory batch writer.

use crate::error::ImportResult;
use crate::types::Batch;

use super::BatchWriter;

/// Collects batches in memory instead of writing them anywhere.
///
/// Useful in tests and for dry runs: the pipeline behaves identically
/// (chunking, coercion, observer callbacks), but rows end up in a `Vec`.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    table: String,
    batches: Vec<Batch>,
}

impl MemoryWriter {
    /// Create a writer labeled with a table name (used only for display).
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            batches: Vec::new(),
        }
    }

    /// Batches written so far, in submission order.
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// Total rows across all written batches.
    pub fn row_count(&self) -> usize {
        self.batches.iter().map(Batch::row_count).sum()
    }
}

impl BatchWriter for MemoryWriter {
    fn write_batch(&mut self, batch: &Batch) -> ImportResult<()> {
        self.batches.push(batch.clone());
        Ok(())
    }

    fn destination(&self) -> String {
        format!("memory:{}", self.table)
    }
}
