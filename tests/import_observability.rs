use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use spanner_csv_loader::pipeline::{
    import_csv, BatchStats, CompositeObserver, ImportContext, ImportObserver, ImportOptions,
    ImportSeverity, ImportStats,
};
use spanner_csv_loader::writer::MemoryWriter;
use spanner_csv_loader::ImportError;

#[derive(Default)]
struct RecordingObserver {
    batches: Mutex<Vec<BatchStats>>,
    successes: Mutex<Vec<ImportStats>>,
    failures: Mutex<Vec<ImportSeverity>>,
    alerts: Mutex<Vec<ImportSeverity>>,
}

impl ImportObserver for RecordingObserver {
    fn on_batch(&self, _ctx: &ImportContext, batch: BatchStats) {
        self.batches.lock().unwrap().push(batch);
    }

    fn on_success(&self, _ctx: &ImportContext, stats: ImportStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(&self, _ctx: &ImportContext, severity: ImportSeverity, _error: &ImportError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &ImportContext, severity: ImportSeverity, _error: &ImportError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

#[test]
fn observer_sees_each_batch_and_the_final_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = ImportOptions {
        chunk_size: NonZeroUsize::new(2),
        observer: Some(obs.clone()),
        ..Default::default()
    };

    let mut writer = MemoryWriter::new("people");
    import_csv("tests/fixtures/people.csv", None, &mut writer, &opts).unwrap();

    let batches = obs.batches.lock().unwrap().clone();
    assert_eq!(
        batches,
        vec![
            BatchStats { ordinal: 1, rows: 2 },
            BatchStats { ordinal: 2, rows: 1 },
        ]
    );
    assert_eq!(
        obs.successes.lock().unwrap().clone(),
        vec![ImportStats { batches: 2, rows: 3 }]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = ImportOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: ImportSeverity::Critical,
        ..Default::default()
    };

    // Missing file -> I/O error -> Critical
    let mut writer = MemoryWriter::new("people");
    let _ = import_csv("tests/fixtures/does_not_exist.csv", None, &mut writer, &opts)
        .unwrap_err();

    assert_eq!(
        obs.failures.lock().unwrap().clone(),
        vec![ImportSeverity::Critical]
    );
    assert_eq!(
        obs.alerts.lock().unwrap().clone(),
        vec![ImportSeverity::Critical]
    );
}

#[test]
fn observer_receives_failure_without_alert_for_non_critical_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = ImportOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: ImportSeverity::Critical,
        ..Default::default()
    };

    // A coercion error is data trouble, not infrastructure trouble -> Error,
    // below the Critical alert threshold.
    let mapping = spanner_csv_loader::schema::TypeMapping::new()
        .with("name", spanner_csv_loader::types::DataType::Int64);
    let mut writer = MemoryWriter::new("people");
    let _ = import_csv("tests/fixtures/people.csv", Some(&mapping), &mut writer, &opts)
        .unwrap_err();

    assert_eq!(
        obs.failures.lock().unwrap().clone(),
        vec![ImportSeverity::Error]
    );
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn composite_observer_fans_out_to_all_observers() {
    let first = Arc::new(RecordingObserver::default());
    let second = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![first.clone(), second.clone()]);

    let opts = ImportOptions {
        observer: Some(Arc::new(composite)),
        ..Default::default()
    };

    let mut writer = MemoryWriter::new("people");
    import_csv("tests/fixtures/people.csv", None, &mut writer, &opts).unwrap();

    for obs in [&first, &second] {
        assert_eq!(obs.batches.lock().unwrap().len(), 1);
        assert_eq!(obs.successes.lock().unwrap().len(), 1);
    }
}
