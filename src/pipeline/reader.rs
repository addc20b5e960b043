//! Lazy CSV-to-batch reader.

use std::fs::File;
use std::io::Read;
use std::num::NonZeroUsize;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{ImportError, ImportResult};
use crate::schema::TypeMapping;
use crate::types::{Batch, DataType, Value};

/// Streaming reader that turns a CSV source into a sequence of [`Batch`]es.
///
/// Rules:
///
/// - The CSV must have a header row; column names and order are taken from it
///   as-is (they must match the destination table).
/// - With `chunk_size = Some(c)`, each batch holds at most `c` rows; with
///   `None`, the whole file becomes one batch.
/// - Cells are coerced per the type mapping; unmapped columns stay strings.
///
/// The reader is a single pass over the file. A CSV or coercion error fails
/// the batch it occurred in and fuses the iterator.
pub struct BatchReader<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    columns: Vec<String>,
    types: Vec<DataType>,
    chunk_size: Option<NonZeroUsize>,
    next_ordinal: usize,
    rows_read: usize,
    done: bool,
}

impl<R: Read> std::fmt::Debug for BatchReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchReader")
            .field("columns", &self.columns)
            .field("types", &self.types)
            .field("chunk_size", &self.chunk_size)
            .field("next_ordinal", &self.next_ordinal)
            .field("rows_read", &self.rows_read)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl BatchReader<File> {
    /// Open a CSV file and prepare batch reading.
    ///
    /// Fails immediately on I/O errors, or with a schema mismatch if `mapping`
    /// names a column the header does not have.
    pub fn from_path(
        path: impl AsRef<Path>,
        mapping: Option<&TypeMapping>,
        chunk_size: Option<NonZeroUsize>,
    ) -> ImportResult<Self> {
        let rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;
        Self::from_reader(rdr, mapping, chunk_size)
    }
}

impl<R: Read> BatchReader<R> {
    /// Prepare batch reading from an existing CSV reader.
    pub fn from_reader(
        mut rdr: csv::Reader<R>,
        mapping: Option<&TypeMapping>,
        chunk_size: Option<NonZeroUsize>,
    ) -> ImportResult<Self> {
        let headers = rdr.headers()?.clone();
        let columns: Vec<String> = headers.iter().map(str::to_owned).collect();

        // A mapped column that is not in the file is almost certainly a typo
        // in the mapping document; fail up front rather than silently keeping
        // the column textual.
        if let Some(mapping) = mapping {
            for mapped in mapping.columns() {
                if !columns.iter().any(|c| c == mapped) {
                    return Err(ImportError::SchemaMismatch {
                        message: format!(
                            "type mapping names column '{mapped}' which is not in the csv header. headers={columns:?}"
                        ),
                    });
                }
            }
        }

        let types: Vec<DataType> = columns
            .iter()
            .map(|c| mapping.map_or(DataType::String, |m| m.type_for(c)))
            .collect();

        Ok(Self {
            records: rdr.into_records(),
            columns,
            types,
            chunk_size,
            next_ordinal: 1,
            rows_read: 0,
            done: false,
        })
    }

    /// Column names, in CSV header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn parse_record(&self, record: &csv::StringRecord) -> ImportResult<Vec<Value>> {
        // Report 1-based row numbers for users; +1 again because the header is row 1.
        let user_row = self.rows_read + 2;

        let mut row: Vec<Value> = Vec::with_capacity(self.columns.len());
        for (idx, (column, data_type)) in self.columns.iter().zip(self.types.iter()).enumerate() {
            let raw = record.get(idx).unwrap_or("");
            row.push(parse_typed_value(user_row, column, *data_type, raw)?);
        }
        Ok(row)
    }
}

impl<R: Read> Iterator for BatchReader<R> {
    type Item = ImportResult<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let limit = self.chunk_size.map(NonZeroUsize::get);
        let mut rows: Vec<Vec<Value>> = Vec::new();

        while limit.is_none_or(|l| rows.len() < l) {
            match self.records.next() {
                None => {
                    self.done = true;
                    break;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                Some(Ok(record)) => match self.parse_record(&record) {
                    Ok(row) => {
                        self.rows_read += 1;
                        rows.push(row);
                    }
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                },
            }
        }

        if rows.is_empty() {
            // Header-only file, or the previous batch consumed the last row.
            self.done = true;
            return None;
        }

        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        Some(Ok(Batch {
            ordinal,
            columns: self.columns.clone(),
            rows,
        }))
    }
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: DataType,
    raw: &str,
) -> ImportResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    let parse_err = |message: String| ImportError::Parse {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::String => Ok(Value::String(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_err(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_err(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_err),
        DataType::Timestamp => DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| Value::Timestamp(dt.with_timezone(&Utc)))
            .map_err(|e| parse_err(format!("expected rfc 3339 timestamp: {e}"))),
        DataType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|e| parse_err(format!("expected YYYY-MM-DD date: {e}"))),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}
