use std::num::NonZeroUsize;

use chrono::{TimeZone, Utc};
use spanner_csv_loader::pipeline::BatchReader;
use spanner_csv_loader::schema::TypeMapping;
use spanner_csv_loader::types::{DataType, Value};
use spanner_csv_loader::ImportError;

fn people_mapping() -> TypeMapping {
    TypeMapping::new()
        .with("id", DataType::Int64)
        .with("score", DataType::Float64)
        .with("active", DataType::Bool)
        .with("signup", DataType::Timestamp)
}

fn reader_over<'a>(
    input: &'a str,
    mapping: Option<&TypeMapping>,
    chunk_size: Option<usize>,
) -> BatchReader<&'a [u8]> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());
    BatchReader::from_reader(rdr, mapping, chunk_size.and_then(NonZeroUsize::new)).unwrap()
}

#[test]
fn whole_file_is_one_batch_without_chunk_size() {
    let mapping = people_mapping();
    let mut reader =
        BatchReader::from_path("tests/fixtures/people.csv", Some(&mapping), None).unwrap();

    let batch = reader.next().unwrap().unwrap();
    assert_eq!(batch.ordinal, 1);
    assert_eq!(batch.columns, vec!["id", "name", "score", "active", "signup"]);
    assert_eq!(batch.row_count(), 3);
    assert_eq!(
        batch.rows[0],
        vec![
            Value::Int64(1),
            Value::String("Ada".to_string()),
            Value::Float64(98.5),
            Value::Bool(true),
            Value::Timestamp(Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()),
        ]
    );
    // Empty cell -> Null, regardless of mapped type.
    assert_eq!(batch.rows[2][2], Value::Null);

    assert!(reader.next().is_none());
}

#[test]
fn chunking_yields_ceil_n_over_c_batches() {
    let mut input = String::from("id\n");
    for i in 0..10 {
        input.push_str(&format!("{i}\n"));
    }
    let mapping = TypeMapping::new().with("id", DataType::Int64);

    let batches: Vec<_> = reader_over(&input, Some(&mapping), Some(3))
        .map(|b| b.unwrap())
        .collect();

    assert_eq!(batches.len(), 4);
    assert_eq!(
        batches.iter().map(|b| b.row_count()).collect::<Vec<_>>(),
        vec![3, 3, 3, 1]
    );
    assert_eq!(
        batches.iter().map(|b| b.ordinal).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
}

#[test]
fn chunk_size_at_least_row_count_yields_one_batch() {
    let input = "id\n1\n2\n3\n";
    let batches: Vec<_> = reader_over(input, None, Some(3)).map(|b| b.unwrap()).collect();
    assert_eq!(batches.len(), 1);

    let batches: Vec<_> = reader_over(input, None, Some(100)).map(|b| b.unwrap()).collect();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].row_count(), 3);
}

#[test]
fn header_only_file_yields_no_batches() {
    let mut reader = reader_over("id,name\n", None, None);
    assert!(reader.next().is_none());

    let mut reader = reader_over("id,name\n", None, Some(5));
    assert!(reader.next().is_none());
}

#[test]
fn unmapped_columns_stay_strings() {
    let input = "id,name\n1,Ada\n";
    let batch = reader_over(input, None, None).next().unwrap().unwrap();
    assert_eq!(
        batch.rows[0],
        vec![Value::String("1".to_string()), Value::String("Ada".to_string())]
    );
}

#[test]
fn coercion_failure_fails_the_whole_batch_and_fuses_the_reader() {
    let input = "id\n1\n2\nnot_an_int\n4\n";
    let mapping = TypeMapping::new().with("id", DataType::Int64);
    let mut reader = reader_over(input, Some(&mapping), Some(2));

    let first = reader.next().unwrap().unwrap();
    assert_eq!(first.row_count(), 2);

    let err = reader.next().unwrap().unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse value"));
    assert!(msg.contains("row 4"));
    assert!(msg.contains("column 'id'"));
    assert!(msg.contains("raw='not_an_int'"));

    // Row 4 is never reached; the error consumed the rest of the pass.
    assert!(reader.next().is_none());
}

#[test]
fn mapping_an_absent_column_fails_construction() {
    let mapping = TypeMapping::new().with("definitely_missing", DataType::Int64);
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader("id,name\n1,Ada\n".as_bytes());

    let err = BatchReader::from_reader(rdr, Some(&mapping), None).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("definitely_missing"));
}

#[test]
fn missing_file_surfaces_as_csv_io_error() {
    let err = BatchReader::<std::fs::File>::from_path("tests/fixtures/nope.csv", None, None)
        .unwrap_err();
    match err {
        ImportError::Csv(e) => assert!(matches!(e.kind(), csv::ErrorKind::Io(_))),
        other => panic!("expected csv io error, got {other:?}"),
    }
}

#[test]
fn bool_cells_accept_common_spellings() {
    let input = "active\nyes\nNO\nT\n0\n";
    let mapping = TypeMapping::new().with("active", DataType::Bool);
    let batch = reader_over(input, Some(&mapping), None).next().unwrap().unwrap();
    assert_eq!(
        batch.rows.iter().map(|r| r[0].clone()).collect::<Vec<_>>(),
        vec![
            Value::Bool(true),
            Value::Bool(false),
            Value::Bool(true),
            Value::Bool(false),
        ]
    );
}

#[test]
fn date_cells_parse_iso_dates() {
    let input = "born\n1815-12-10\n";
    let mapping = TypeMapping::new().with("born", DataType::Date);
    let batch = reader_over(input, Some(&mapping), None).next().unwrap().unwrap();
    assert_eq!(
        batch.rows[0][0],
        Value::Date(chrono::NaiveDate::from_ymd_opt(1815, 12, 10).unwrap())
    );
}

#[test]
fn timestamp_offsets_normalize_to_utc() {
    let input = "at\n2024-06-01T12:00:00+02:00\n";
    let mapping = TypeMapping::new().with("at", DataType::Timestamp);
    let batch = reader_over(input, Some(&mapping), None).next().unwrap().unwrap();
    assert_eq!(
        batch.rows[0][0],
        Value::Timestamp(Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap())
    );
}

#[test]
fn bad_timestamp_reports_row_and_column() {
    let input = "at\nyesterday\n";
    let mapping = TypeMapping::new().with("at", DataType::Timestamp);
    let err = reader_over(input, Some(&mapping), None)
        .next()
        .unwrap()
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("row 2"));
    assert!(msg.contains("column 'at'"));
    assert!(msg.contains("rfc 3339"));
}

#[test]
fn ragged_row_surfaces_as_csv_error() {
    let input = "id,name\n1,Ada\n2\n";
    let mut reader = reader_over(input, None, None);
    let err = reader.next().unwrap().unwrap_err();
    assert!(matches!(err, ImportError::Csv(_)));
    assert!(reader.next().is_none());
}
