use std::cell::RefCell;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use tempfile::TempDir;
use trim_studio::extraction::{ExtractionController, ExtractionState};
use trim_studio::media::{DurationProbe, TranscodeOutcome, TranscodeRequest, Transcoder};
use trim_studio::playback::{
    EngineEvent, EngineResult, EventSink, PlaybackController, PlaybackEngine, RecoveryPolicy,
};
use trim_studio::workbench::{PickedFile, StatusKind, Workbench};

struct FixedProbe(f64);

impl DurationProbe for FixedProbe {
    fn probe_duration(&self, _path: &Path) -> f64 {
        self.0
    }
}

#[derive(Clone, Default)]
struct RecordingTranscoder {
    requests: Rc<RefCell<Vec<TranscodeRequest>>>,
    fail_with: Option<String>,
}

impl Transcoder for RecordingTranscoder {
    fn transcode(&self, request: &TranscodeRequest) -> Result<TranscodeOutcome, Box<dyn Error>> {
        self.requests.borrow_mut().push(request.clone());
        if let Some(diagnostic) = &self.fail_with {
            return Ok(TranscodeOutcome {
                success: false,
                diagnostic: diagnostic.clone(),
            });
        }
        std::fs::write(&request.output, b"ID3")?;
        Ok(TranscodeOutcome {
            success: true,
            diagnostic: String::new(),
        })
    }
}

/// Records every sink it is handed so tests can play a stale engine.
#[derive(Default)]
struct Recorded {
    engines: usize,
    sinks: Vec<EventSink>,
    loads: Vec<PathBuf>,
}

struct ScriptedEngine {
    recorded: Rc<RefCell<Recorded>>,
}

impl PlaybackEngine for ScriptedEngine {
    fn subscribe(&mut self, sink: EventSink) {
        self.recorded.borrow_mut().sinks.push(sink);
    }

    fn unsubscribe(&mut self) {}

    fn load(&mut self, path: &Path) -> EngineResult<()> {
        self.recorded.borrow_mut().loads.push(path.to_path_buf());
        Ok(())
    }

    fn play(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn pause(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn seek(&mut self, _position: Duration) -> EngineResult<()> {
        Ok(())
    }
}

fn scripted_factory(
    recorded: &Rc<RefCell<Recorded>>,
) -> impl FnMut() -> EngineResult<ScriptedEngine> + use<> {
    let recorded = Rc::clone(recorded);
    move || -> EngineResult<ScriptedEngine> {
        recorded.borrow_mut().engines += 1;
        Ok(ScriptedEngine {
            recorded: Rc::clone(&recorded),
        })
    }
}

#[test]
fn test_select_then_adjust_range() {
    let recorded = Rc::new(RefCell::new(Recorded::default()));
    let mut bench = Workbench::new(
        FixedProbe(120.0),
        RecordingTranscoder::default(),
        scripted_factory(&recorded),
        RecoveryPolicy::immediate(),
    );

    assert!(bench.select_file(Some(PickedFile::from_path(PathBuf::from("/music/set.mp3")))));
    let range = bench.session().range();
    assert_eq!((range.start, range.end), (0.0, 120.0));

    assert!(!bench.session_mut().set_start(130.0));
    assert_eq!(bench.session().range().start, 0.0);

    assert!(bench.session_mut().set_end(60.0));
    assert_eq!(bench.session().range().end, 60.0);
}

#[test]
fn test_extraction_without_file_never_calls_transcoder() {
    let transcoder = RecordingTranscoder::default();
    let mut extraction = ExtractionController::new(transcoder.clone());

    let state = extraction.request_extraction(None, 0.0, 10.0, Path::new("/tmp/out.mp3"));

    assert_eq!(
        state,
        &ExtractionState::Error {
            message: "Please select an MP3 file first".to_string()
        }
    );
    assert!(transcoder.requests.borrow().is_empty());
}

#[test]
fn test_extract_then_play_result() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("interview.mp3");
    std::fs::write(&source, b"ID3").unwrap();

    let recorded = Rc::new(RefCell::new(Recorded::default()));
    let transcoder = RecordingTranscoder::default();
    let mut bench = Workbench::new(
        FixedProbe(300.0),
        transcoder.clone(),
        scripted_factory(&recorded),
        RecoveryPolicy::immediate(),
    );

    bench.select_file(Some(PickedFile::from_path(source.clone())));
    assert!(bench.set_start_text("1:00"));
    assert!(bench.set_end_text("2:30.5"));

    let state = bench.extract_to(Some(dir.path())).clone();
    let output = dir.path().join("interview_1-00_0_to_2-30_5.mp3");
    assert_eq!(
        state,
        ExtractionState::Success {
            output_path: output.clone()
        }
    );
    assert!(output.exists());

    let requests = transcoder.requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].input, source);
    assert_eq!(requests[0].start_seconds, 60.0);
    assert_eq!(requests[0].end_seconds, 150.5);
    assert_eq!(requests[0].bitrate_kbps, 192);
    drop(requests);

    assert!(bench.load_result());
    bench.playback_mut().toggle_play();
    let playback = bench.playback().state();
    assert!(playback.loaded);
    assert!(playback.playing);
    assert_eq!(recorded.borrow().loads, vec![output]);
}

#[test]
fn test_failed_transcode_keeps_diagnostic() {
    let dir = TempDir::new().unwrap();
    let recorded = Rc::new(RefCell::new(Recorded::default()));
    let transcoder = RecordingTranscoder {
        fail_with: Some("Invalid data found when processing input".to_string()),
        ..Default::default()
    };
    let mut bench = Workbench::new(
        FixedProbe(30.0),
        transcoder,
        scripted_factory(&recorded),
        RecoveryPolicy::immediate(),
    );
    bench.select_file(Some(PickedFile::from_path(dir.path().join("broken.mp3"))));

    let state = bench.extract_to(Some(dir.path())).clone();

    let message = match state {
        ExtractionState::Error { message } => message,
        other => panic!("expected an error state, got {other:?}"),
    };
    assert!(message.contains("Invalid data found when processing input"));
    assert_eq!(bench.status().unwrap().kind, StatusKind::Error);
    assert!(!bench.load_result());
}

#[test]
fn test_missing_file_errors_without_engine() {
    let recorded = Rc::new(RefCell::new(Recorded::default()));
    let mut playback =
        PlaybackController::new(scripted_factory(&recorded), RecoveryPolicy::immediate());

    assert!(!playback.load(Path::new("/no/such/file.mp3")));

    assert!(playback.state().has_error);
    assert!(!playback.state().loaded);
    assert_eq!(recorded.borrow().engines, 0);
    assert!(recorded.borrow().loads.is_empty());
}

#[test]
fn test_events_from_replaced_engine_are_ignored() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.mp3");
    std::fs::write(&file, b"ID3").unwrap();

    let recorded = Rc::new(RefCell::new(Recorded::default()));
    let mut playback =
        PlaybackController::new(scripted_factory(&recorded), RecoveryPolicy::immediate());
    assert!(playback.load(&file));

    let first_sink = recorded.borrow().sinks[0].clone();
    first_sink.emit(EngineEvent::DurationChanged(Duration::from_secs(42)));
    playback.process_events();
    assert_eq!(playback.state().duration, Duration::from_secs(42));

    assert!(playback.repair());
    assert_eq!(recorded.borrow().engines, 2);

    // The old engine keeps talking after it was replaced
    first_sink.emit(EngineEvent::PositionChanged(Duration::from_secs(30)));
    first_sink.emit(EngineEvent::StateChanged { playing: true });
    playback.process_events();

    assert_eq!(playback.state().position, Duration::ZERO);
    assert!(!playback.state().playing);

    let current_sink = recorded.borrow().sinks.last().unwrap().clone();
    current_sink.emit(EngineEvent::PositionChanged(Duration::from_secs(3)));
    playback.process_events();
    assert_eq!(playback.state().position, Duration::from_secs(3));
}

#[test]
fn test_dispose_twice() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.mp3");
    std::fs::write(&file, b"ID3").unwrap();

    let recorded = Rc::new(RefCell::new(Recorded::default()));
    let mut playback =
        PlaybackController::new(scripted_factory(&recorded), RecoveryPolicy::immediate());
    playback.dispose();
    assert!(playback.load(&file));

    playback.dispose();
    playback.dispose();
    assert!(!playback.has_engine());
    assert!(!playback.state().loaded);
}
