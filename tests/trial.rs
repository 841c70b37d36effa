//! End-to-end trials: generate script files, replay them across workers,
//! read the report.
#![cfg(not(feature = "shuttle"))]

use std::fs;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tempfile::tempdir;

use lockstripe::record::StripedRecord;
use lockstripe::replay::ReplayError;
use lockstripe::runner::replay_script_files;
use lockstripe::workload::Mix;

type TrialRecord = StripedRecord<i64, 3>;

fn uniform() -> Mix {
    Mix::from_labels([
        ("read 0", 1.0),
        ("write 0 1", 1.0),
        ("read 1", 1.0),
        ("write 1 1", 1.0),
        ("read 2", 1.0),
        ("write 2 1", 1.0),
        ("snapshot", 1.0),
    ])
    .unwrap()
}

#[test]
fn trial_replays_every_script_to_completion() {
    let dir = tempdir().unwrap();
    let mut rng = SmallRng::seed_from_u64(7);
    let paths: Vec<_> = (0..3)
        .map(|worker| dir.path().join(format!("uniform_{worker}.txt")))
        .collect();
    for path in &paths {
        uniform().write_script_file(path, 500, &mut rng).unwrap();
    }

    let report = replay_script_files::<TrialRecord, 3>(&paths).unwrap();

    assert_eq!(report.threads, 3);
    assert_eq!(report.stats.executed, 1_500);
    assert_eq!(report.stats.skipped, 0);
    assert!(report.elapsed > Duration::ZERO);
}

#[test]
fn missing_script_fails_the_trial() {
    let dir = tempdir().unwrap();
    let missing = vec![dir.path().join("absent.txt")];

    let error = replay_script_files::<TrialRecord, 3>(&missing).unwrap_err();

    assert!(matches!(error, ReplayError::Io(_)));
}

#[test]
fn malformed_lines_are_counted_not_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("script.txt");
    fs::write(&path, "write 0 5\nfrobnicate\nread 0\n\nsnapshot\nwrite 1\n").unwrap();

    let report = replay_script_files::<TrialRecord, 3>(&[path]).unwrap();

    assert_eq!(report.stats.executed, 3);
    assert_eq!(report.stats.skipped, 2);
}

#[test]
fn out_of_range_operation_fails_the_trial() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("script.txt");
    fs::write(&path, "write 0 1\nread 3\n").unwrap();

    let error = replay_script_files::<TrialRecord, 3>(&[path]).unwrap_err();

    assert!(matches!(error, ReplayError::OutOfRange(_)));
}
