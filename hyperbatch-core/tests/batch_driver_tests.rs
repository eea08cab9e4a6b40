// hyperbatch-core/tests/batch_driver_tests.rs

use hyperbatch_core::batch::{BatchDriver, BatchJob, DriverState};
use hyperbatch_core::bitrate::BitrateEstimator;
use hyperbatch_core::calibration::CalibrationCatalog;
use hyperbatch_core::config::FileErrorPolicy;
use hyperbatch_core::engine::EngineEvent;
use hyperbatch_core::error::CoreError;
use hyperbatch_core::events::{Event, EventDispatcher, EventHandler};
use hyperbatch_core::external::mocks::{MockEngine, MockScript, MockVideoInfoReader};
use hyperbatch_core::media::{FrameRate, Rotation, VideoInfo};
use hyperbatch_core::parameters::ParameterBuilder;
use hyperbatch_core::reporting::FileStatus;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

// ---- Fixtures ----

struct Fixture {
    dir: TempDir,
    files: Vec<PathBuf>,
    reader: MockVideoInfoReader,
}

/// Creates the named files and registers 1080p30 metadata for each.
fn fixture(names: &[&str]) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let mut reader = MockVideoInfoReader::new();
    let mut files = Vec::new();
    for name in names {
        let path = dir.path().join(name);
        File::create(&path).unwrap();
        reader = reader.with_info(VideoInfo::new(
            &path,
            1920,
            1080,
            FrameRate::from_integer(30),
            8_000_000,
            Rotation::None,
        ));
        files.push(path);
    }
    Fixture { dir, files, reader }
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl EventHandler for Recorder {
    fn handle(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }
}

impl Recorder {
    fn states(&self) -> Vec<DriverState> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::StateChanged { state } => Some(*state),
                _ => None,
            })
            .collect()
    }

    fn progress_count(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, Event::EngineProgress { .. }))
            .count()
    }
}

fn dispatcher_with(recorder: &Arc<Recorder>) -> Arc<EventDispatcher> {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_handler(recorder.clone());
    Arc::new(dispatcher)
}

fn name_of(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

// ---- Tests ----

#[test]
fn test_files_processed_in_order_one_at_a_time() {
    let fx = fixture(&["a.mov", "b.mp4", "c.wmv"]);
    let engine = MockEngine::new().with_delay(Duration::from_millis(30));
    let handle = engine.handle();

    let catalog = CalibrationCatalog::builtin();
    let estimator = BitrateEstimator::new();
    let builder = ParameterBuilder::new(&fx.reader, &catalog, &estimator);
    let job = BatchJob::from_files(&fx.files, "Output", 10, None).unwrap();

    let summary = BatchDriver::new(engine, builder).run(&job).unwrap();

    assert_eq!(handle.submitted_names(), vec!["a.mov", "b.mp4", "c.wmv"]);
    assert_eq!(handle.overlaps(), 0);
    assert!(handle.disposed());
    assert_eq!(handle.starts_after_dispose(), 0);

    assert_eq!(summary.total(), 3);
    assert!(summary.all_succeeded());
    for (result, input) in summary.results.iter().zip(&fx.files) {
        assert_eq!(&result.input, input);
        assert_eq!(result.output, fx.dir.path().join("Output").join(name_of(input)));
    }
    assert!(fx.dir.path().join("Output").is_dir());

    let submissions = handle.submissions();
    assert!(submissions.iter().all(|s| s.speedup_factor == 10));
    assert!(submissions.iter().all(|s| s.calibration_id == "generic-1080p30"));
    assert!(submissions[0].input_uri.starts_with("file://"));
}

#[test]
fn test_engine_failure_does_not_stop_batch() {
    let fx = fixture(&["a.mp4", "b.mp4", "c.mp4"]);
    let engine = MockEngine::new().with_script("b.mp4", MockScript::fail("encoder exploded"));
    let handle = engine.handle();

    let catalog = CalibrationCatalog::builtin();
    let estimator = BitrateEstimator::new();
    let builder = ParameterBuilder::new(&fx.reader, &catalog, &estimator);
    let job = BatchJob::from_files(&fx.files, "Output", 4, None).unwrap();

    let summary = BatchDriver::new(engine, builder).run(&job).unwrap();

    assert_eq!(handle.submitted_names(), vec!["a.mp4", "b.mp4", "c.mp4"]);
    assert_eq!(summary.results[0].status, FileStatus::Succeeded);
    assert_eq!(
        summary.results[1].status,
        FileStatus::Failed("encoder exploded".to_string())
    );
    assert_eq!(summary.results[2].status, FileStatus::Succeeded);
    assert_eq!(summary.failed(), 1);
    assert!(!summary.all_succeeded());
}

#[test]
fn test_cancellation_is_recorded_and_batch_continues() {
    let fx = fixture(&["a.mp4", "b.mp4"]);
    let engine = MockEngine::new().with_script("a.mp4", MockScript::cancel());
    let handle = engine.handle();

    let catalog = CalibrationCatalog::builtin();
    let estimator = BitrateEstimator::new();
    let builder = ParameterBuilder::new(&fx.reader, &catalog, &estimator);
    let job = BatchJob::from_files(&fx.files, "Output", 4, None).unwrap();

    let summary = BatchDriver::new(engine, builder).run(&job).unwrap();

    assert_eq!(handle.submissions().len(), 2);
    assert_eq!(summary.results[0].status, FileStatus::Cancelled);
    assert_eq!(summary.results[1].status, FileStatus::Succeeded);
    assert_eq!(summary.cancelled(), 1);
}

#[test]
fn test_duplicate_terminal_event_is_ignored() {
    let fx = fixture(&["a.mp4", "b.mp4", "c.mp4"]);
    let engine = MockEngine::new()
        .with_script("a.mp4", MockScript::finish_twice())
        .with_script(
            "b.mp4",
            MockScript::Events(vec![EngineEvent::Cancelled, EngineEvent::Finished]),
        );
    let handle = engine.handle();

    let catalog = CalibrationCatalog::builtin();
    let estimator = BitrateEstimator::new();
    let builder = ParameterBuilder::new(&fx.reader, &catalog, &estimator);
    let job = BatchJob::from_files(&fx.files, "Output", 4, None).unwrap();

    let summary = BatchDriver::new(engine, builder).run(&job).unwrap();

    // Exactly one result per file; first terminal event wins
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.results[0].status, FileStatus::Succeeded);
    assert_eq!(summary.results[1].status, FileStatus::Cancelled);
    assert_eq!(summary.results[2].status, FileStatus::Succeeded);
    assert_eq!(handle.submitted_names(), vec!["a.mp4", "b.mp4", "c.mp4"]);
}

#[test]
fn test_unreadable_file_skipped_by_default() {
    let mut fx = fixture(&["a.mp4", "c.mp4"]);
    let broken = fx.dir.path().join("b.mp4");
    File::create(&broken).unwrap();
    fx.reader = fx.reader.clone().with_error(&broken, "invalid data found");
    fx.files.insert(1, broken);

    let engine = MockEngine::new();
    let handle = engine.handle();
    let catalog = CalibrationCatalog::builtin();
    let estimator = BitrateEstimator::new();
    let builder = ParameterBuilder::new(&fx.reader, &catalog, &estimator);
    let job = BatchJob::from_files(&fx.files, "Output", 4, None).unwrap();

    let summary = BatchDriver::new(engine, builder).run(&job).unwrap();

    assert_eq!(handle.submitted_names(), vec!["a.mp4", "c.mp4"]);
    assert!(matches!(summary.results[1].status, FileStatus::Skipped(ref msg) if msg.contains("invalid data found")));
    assert_eq!(summary.skipped(), 1);
    assert_eq!(summary.succeeded(), 2);
    assert!(handle.disposed());
}

#[test]
fn test_abort_policy_stops_at_first_unprocessable_file() {
    let mut fx = fixture(&["a.mp4", "c.mp4"]);
    let huge = fx.dir.path().join("b.mp4");
    File::create(&huge).unwrap();
    fx.reader = fx.reader.clone().with_info(VideoInfo::new(
        &huge,
        7680,
        4320,
        FrameRate::from_integer(30),
        80_000_000,
        Rotation::None,
    ));
    fx.files.insert(1, huge.clone());

    let engine = MockEngine::new();
    let handle = engine.handle();
    let catalog = CalibrationCatalog::builtin();
    let estimator = BitrateEstimator::new();
    let builder = ParameterBuilder::new(&fx.reader, &catalog, &estimator);
    let job = BatchJob::from_files(&fx.files, "Output", 4, None).unwrap();

    let err = BatchDriver::new(engine, builder)
        .with_policy(FileErrorPolicy::AbortBatch)
        .run(&job)
        .unwrap_err();

    match err {
        CoreError::BatchAborted {
            path,
            reason,
            completed,
        } => {
            assert_eq!(path, huge);
            assert!(reason.contains("No calibration profile"), "{reason}");
            // Files finished before the abort are still reported
            assert_eq!(completed.total(), 1);
            assert_eq!(completed.results[0].input, fx.files[0]);
            assert_eq!(completed.results[0].status, FileStatus::Succeeded);
        }
        other => panic!("Unexpected error: {other:?}"),
    }
    assert_eq!(handle.submitted_names(), vec!["a.mp4"]);
    assert!(handle.disposed());
}

#[test]
fn test_rejected_start_is_per_file() {
    let fx = fixture(&["a.mp4", "b.mp4"]);
    let engine = MockEngine::new().with_script("a.mp4", MockScript::RejectStart("busy".to_string()));
    let handle = engine.handle();

    let catalog = CalibrationCatalog::builtin();
    let estimator = BitrateEstimator::new();
    let builder = ParameterBuilder::new(&fx.reader, &catalog, &estimator);
    let job = BatchJob::from_files(&fx.files, "Output", 4, None).unwrap();

    let summary = BatchDriver::new(engine, builder).run(&job).unwrap();

    assert_eq!(handle.submissions().len(), 2);
    assert!(matches!(summary.results[0].status, FileStatus::Skipped(ref msg) if msg.contains("busy")));
    assert_eq!(summary.results[1].status, FileStatus::Succeeded);
}

#[test]
fn test_state_sequence_and_progress_events() {
    let fx = fixture(&["a.mp4", "b.mp4"]);
    let engine = MockEngine::new().with_script("b.mp4", MockScript::fail("nope"));
    let recorder = Arc::new(Recorder::default());

    let catalog = CalibrationCatalog::builtin();
    let estimator = BitrateEstimator::new();
    let builder = ParameterBuilder::new(&fx.reader, &catalog, &estimator);
    let job = BatchJob::from_files(&fx.files, "Output", 4, None).unwrap();

    BatchDriver::new(engine, builder)
        .with_events(dispatcher_with(&recorder))
        .run(&job)
        .unwrap();

    use DriverState::*;
    assert_eq!(
        recorder.states(),
        vec![
            PreparingFile,
            Submitted,
            AwaitingCompletion,
            Finished,
            PreparingFile,
            Submitted,
            AwaitingCompletion,
            Failed,
            Done,
        ]
    );
    // Default script reports two progress steps for a.mp4
    assert_eq!(recorder.progress_count(), 2);

    let events = recorder.events.lock().unwrap();
    assert!(matches!(events.first(), Some(Event::BatchStarted { total_files: 2, .. })));
    assert!(matches!(events.last(), Some(Event::BatchCompleted { .. })));
}

#[test]
fn test_output_frame_rate_override_reaches_engine() {
    let fx = fixture(&["a.mp4"]);
    let engine = MockEngine::new();
    let handle = engine.handle();

    let catalog = CalibrationCatalog::builtin();
    let estimator = BitrateEstimator::new();
    let builder = ParameterBuilder::new(&fx.reader, &catalog, &estimator);
    let job = BatchJob::from_files(&fx.files, "Output", 4, Some(FrameRate::from_integer(60))).unwrap();

    BatchDriver::new(engine, builder).run(&job).unwrap();

    let submission = &handle.submissions()[0];
    assert_eq!(submission.output_frame_rate, "60");
    assert_eq!(submission.output_bitrate, 16_000_000);
}
