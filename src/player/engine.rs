//! rodio-backed playback engine.
//!
//! One output stream and one sink per engine. A watcher thread polls the sink
//! and reports through the [`EventSink`] it was subscribed with; the thread is
//! stopped and joined on unsubscribe, so an engine never reports after it has
//! been replaced.

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use trim_studio::media::FfmpegProbe;
use trim_studio::playback::{EngineEvent, EngineResult, EventSink, PlaybackEngine};

const WATCH_INTERVAL: Duration = Duration::from_millis(100);

struct Watcher {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

pub struct RodioEngine {
    // Must outlive the sink; dropping it silences playback
    _stream: OutputStream,
    sink: Arc<Sink>,
    probe: FfmpegProbe,
    current_path: Option<PathBuf>,
    events: Option<EventSink>,
    watcher: Option<Watcher>,
}

impl RodioEngine {
    pub fn new(probe: FfmpegProbe) -> EngineResult<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        stream.log_on_drop(false);
        let sink = Sink::connect_new(stream.mixer());
        sink.pause();

        log::debug!("Opened default audio output");
        Ok(Self {
            _stream: stream,
            sink: Arc::new(sink),
            probe,
            current_path: None,
            events: None,
            watcher: None,
        })
    }

    /// Decode `path` and queue it on the sink. Returns the decoder's idea of
    /// the duration, if it has one.
    fn append_source(&self, path: &Path) -> EngineResult<Option<Duration>> {
        let file = File::open(path)?;
        let decoder = Decoder::new(BufReader::new(file))?;
        let duration = decoder.total_duration();
        self.sink.append(decoder);
        Ok(duration)
    }

    /// The sink drops a source once it has played through; put it back so
    /// play and seek work after the end.
    fn ensure_source(&self) -> EngineResult<()> {
        if self.sink.empty()
            && let Some(path) = &self.current_path
        {
            log::debug!("Re-queueing {} after it finished", path.display());
            self.append_source(path)?;
        }
        Ok(())
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }

    fn stop_watcher(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.stop.store(true, Ordering::Relaxed);
            if watcher.handle.join().is_err() {
                log::warn!("Playback watcher thread panicked");
            }
        }
    }
}

impl PlaybackEngine for RodioEngine {
    fn subscribe(&mut self, sink: EventSink) {
        self.unsubscribe();

        let stop = Arc::new(AtomicBool::new(false));
        let handle = {
            let stop = Arc::clone(&stop);
            let audio = Arc::clone(&self.sink);
            let events = sink.clone();
            thread::spawn(move || watch(&audio, &events, &stop))
        };

        self.events = Some(sink);
        self.watcher = Some(Watcher { stop, handle });
    }

    fn unsubscribe(&mut self) {
        self.stop_watcher();
        self.events = None;
    }

    fn load(&mut self, path: &Path) -> EngineResult<()> {
        self.sink.clear();
        self.current_path = None;

        let decoded = self.append_source(path)?;
        self.sink.pause();
        self.current_path = Some(path.to_path_buf());

        let duration = decoded
            .or_else(|| {
                log::debug!("Decoder has no duration for {}, probing", path.display());
                self.probe
                    .try_probe(path)
                    .map(Duration::from_secs_f64)
            })
            .unwrap_or(Duration::ZERO);

        self.emit(EngineEvent::DurationChanged(duration));
        self.emit(EngineEvent::PositionChanged(Duration::ZERO));
        Ok(())
    }

    fn play(&mut self) -> EngineResult<()> {
        if self.current_path.is_none() {
            return Err("nothing loaded".into());
        }
        self.ensure_source()?;
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) -> EngineResult<()> {
        self.sink.pause();
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> EngineResult<()> {
        self.ensure_source()?;
        self.sink
            .try_seek(position)
            .map_err(|e| format!("seek to {position:?} failed: {e}"))?;
        self.emit(EngineEvent::PositionChanged(position));
        Ok(())
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        self.unsubscribe();
        self.sink.stop();
    }
}

/// Poll loop run on the watcher thread. Reports only changes.
fn watch(sink: &Sink, events: &EventSink, stop: &AtomicBool) {
    let mut last_playing = None;
    let mut last_position = None;
    let mut had_source = !sink.empty();

    while !stop.load(Ordering::Relaxed) {
        let empty = sink.empty();
        let paused = sink.is_paused();
        let playing = !paused && !empty;

        if last_playing != Some(playing) {
            last_playing = Some(playing);
            if !events.emit(EngineEvent::StateChanged { playing }) {
                break;
            }
        }

        let position = sink.get_pos();
        if last_position != Some(position) {
            last_position = Some(position);
            events.emit(EngineEvent::PositionChanged(position));
        }

        if had_source && empty && !paused {
            log::debug!("Sink drained");
            events.emit(EngineEvent::Completed);
        }
        had_source = !empty;

        thread::sleep(WATCH_INTERVAL);
    }
}
