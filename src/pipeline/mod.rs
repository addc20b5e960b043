//! CSV-to-batch pipeline.
//!
//! Most callers should use [`import_csv`] (from [`import`]), which:
//!
//! - reads the CSV lazily, in chunks if a chunk size is set
//! - coerces cells per an optional [`crate::schema::TypeMapping`]
//! - submits each batch to a [`crate::writer::BatchWriter`]
//! - optionally reports progress/outcomes to an [`ImportObserver`]
//!
//! The lower-level [`BatchReader`] is available for callers that want to drive
//! batch consumption themselves (the Spanner writer's async loader does this).

pub mod import;
pub mod observability;
pub mod reader;

pub use import::{import_csv, ImportOptions};
pub use observability::{
    BatchStats, CompositeObserver, FileObserver, ImportContext, ImportObserver, ImportSeverity,
    ImportStats, StdErrObserver,
};
pub use reader::BatchReader;
