//! Checkpoint selection against real log files on disk.

use std::fs;
use std::path::PathBuf;

use cutbench::error::EvalError;
use cutbench::{select_best_iteration, training_log_path, CheckpointRef, TaskKind};

fn write_log(dir: &tempfile::TempDir, content: &str) -> PathBuf {
    let path = training_log_path(dir.path(), 40, 50);
    fs::write(&path, content).unwrap();
    path
}

const TWO_ITERATION_LOG: &str = "\
starting training for nrange 40-50
iter 3 eps 0.95 average reward 10.0
saving model snapshot
iter 7 eps 0.82 average reward 14.0
";

#[test]
fn maximize_selects_the_largest_metric() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(&dir, TWO_ITERATION_LOG);

    let best = select_best_iteration(&log, TaskKind::Maxcut.direction()).unwrap();
    assert_eq!(best.iteration, 7);
    assert_eq!(best.metric, 14.0);
}

#[test]
fn minimize_selects_the_smallest_metric() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(&dir, TWO_ITERATION_LOG);

    let best = select_best_iteration(&log, TaskKind::Mvc.direction()).unwrap();
    assert_eq!(best.iteration, 3);
    assert_eq!(best.metric, 10.0);
}

#[test]
fn log_without_metric_lines_yields_no_valid_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(&dir, "starting training\nshutting down\n");

    let err = select_best_iteration(&log, TaskKind::Maxcut.direction()).unwrap_err();
    assert!(matches!(err, EvalError::NoValidCheckpoint { .. }));
}

#[test]
fn selected_iteration_resolves_to_the_conventional_path() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(&dir, TWO_ITERATION_LOG);

    let best = select_best_iteration(&log, TaskKind::Maxcut.direction()).unwrap();
    let checkpoint = CheckpointRef::new(dir.path(), 40, 50, best.iteration).resolve();

    assert_eq!(
        checkpoint.file_name().unwrap().to_str().unwrap(),
        "nrange_40_50_iter_7.model"
    );
    assert_eq!(checkpoint.parent().unwrap(), dir.path());
}
