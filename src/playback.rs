//! Playback of a single file through a replaceable engine.
//!
//! `PlaybackController` owns one [`PlaybackEngine`] at a time, created through
//! an [`EngineFactory`]. Engines report progress asynchronously through an
//! [`EventSink`]; every sink is stamped with the generation that was current
//! when it was handed out, and [`PlaybackController::process_events`] drops
//! anything sent under an older generation. The generation moves forward on
//! every load, engine replacement and disposal, so a watcher thread that
//! outlives its engine can never change the state of its successor.
//!
//! Engine faults never escape the controller. They set the error flag and
//! message on [`PlaybackState`], and [`PlaybackController::repair`] is the way
//! back out.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::notify::Broadcast;

// Result type used across the engine seam
pub type EngineResult<T> = Result<T, Box<dyn Error>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    StateChanged { playing: bool },
    DurationChanged(Duration),
    PositionChanged(Duration),
    Completed,
}

/// Sending half of an engine's event stream.
#[derive(Debug, Clone)]
pub struct EventSink {
    generation: u64,
    tx: mpsc::Sender<(u64, EngineEvent)>,
}

impl EventSink {
    /// Returns `false` once the controller is gone and nobody is listening.
    pub fn emit(&self, event: EngineEvent) -> bool {
        self.tx.send((self.generation, event)).is_ok()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub trait PlaybackEngine {
    /// Start reporting state, duration, position and completion to `sink`.
    fn subscribe(&mut self, sink: EventSink);
    /// Stop reporting. Must be safe to call when not subscribed.
    fn unsubscribe(&mut self);
    fn load(&mut self, path: &Path) -> EngineResult<()>;
    fn play(&mut self) -> EngineResult<()>;
    fn pause(&mut self) -> EngineResult<()>;
    fn seek(&mut self, position: Duration) -> EngineResult<()>;
}

pub trait EngineFactory {
    type Engine: PlaybackEngine;

    fn create(&mut self) -> EngineResult<Self::Engine>;
}

impl<E, F> EngineFactory for F
where
    E: PlaybackEngine,
    F: FnMut() -> EngineResult<E>,
{
    type Engine = E;

    fn create(&mut self) -> EngineResult<E> {
        self()
    }
}

/// How the controller recovers from engine faults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoveryPolicy {
    /// Extra attempts after a failed engine load.
    pub max_load_retries: u32,
    pub retry_delay: Duration,
    /// Throw the engine away and build a new one before each retry.
    pub recreate_before_retry: bool,
    /// Pause between rebuilding the engine and reloading in `repair`.
    pub repair_delay: Duration,
    /// Reload before resuming when position and duration both read zero.
    pub reload_on_stale_resume: bool,
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        Self {
            max_load_retries: 1,
            retry_delay: Duration::from_millis(300),
            recreate_before_retry: false,
            repair_delay: Duration::from_millis(500),
            reload_on_stale_resume: false,
        }
    }
}

impl RecoveryPolicy {
    /// No waiting and no retries, handy for tests and scripted use.
    pub fn immediate() -> Self {
        Self {
            max_load_retries: 0,
            retry_delay: Duration::ZERO,
            recreate_before_retry: false,
            repair_delay: Duration::ZERO,
            reload_on_stale_resume: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackState {
    pub loaded: bool,
    pub playing: bool,
    pub has_error: bool,
    pub error_message: String,
    pub current_file_path: Option<PathBuf>,
    pub duration: Duration,
    pub position: Duration,
}

impl PlaybackState {
    /// Position as a fraction of the duration, in `[0.0, 1.0]`.
    pub fn progress_percent(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.position.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

pub struct PlaybackController<F: EngineFactory> {
    factory: F,
    engine: Option<F::Engine>,
    policy: RecoveryPolicy,
    generation: u64,
    events_tx: mpsc::Sender<(u64, EngineEvent)>,
    events_rx: mpsc::Receiver<(u64, EngineEvent)>,
    state: PlaybackState,
    listeners: Broadcast<PlaybackState>,
}

impl<F: EngineFactory> PlaybackController<F> {
    pub fn new(factory: F, policy: RecoveryPolicy) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            factory,
            engine: None,
            policy,
            generation: 0,
            events_tx,
            events_rx,
            state: PlaybackState::default(),
            listeners: Broadcast::new(),
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn policy(&self) -> &RecoveryPolicy {
        &self.policy
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Receives a snapshot of the state after every change.
    pub fn subscribe(&mut self) -> mpsc::Receiver<PlaybackState> {
        self.listeners.subscribe()
    }

    /// Load `path`, replacing whatever was loaded before. Returns whether the
    /// file ended up loaded.
    pub fn load(&mut self, path: &Path) -> bool {
        self.state.has_error = false;
        self.state.error_message.clear();

        if !path.exists() {
            self.fail(format!("Audio file not found: {}", path.display()));
            return false;
        }

        self.state.loaded = false;
        self.state.playing = false;
        self.state.position = Duration::ZERO;
        self.state.duration = Duration::ZERO;
        // Recorded up front so `repair` can retry a file whose load failed
        self.state.current_file_path = Some(path.to_path_buf());

        let mut attempt = 0;
        loop {
            match self.try_load(path) {
                Ok(()) => {
                    log::info!("Loaded {}", path.display());
                    self.state.loaded = true;
                    self.notify();
                    return true;
                }
                Err(e) if attempt < self.policy.max_load_retries => {
                    attempt += 1;
                    log::warn!(
                        "Load of {} failed ({e}), retry {attempt}/{} in {:?}",
                        path.display(),
                        self.policy.max_load_retries,
                        self.policy.retry_delay
                    );
                    if self.policy.recreate_before_retry {
                        self.teardown_engine();
                    }
                    if !self.policy.retry_delay.is_zero() {
                        thread::sleep(self.policy.retry_delay);
                    }
                }
                Err(e) => {
                    self.fail(format!("Could not load {}: {e}", path.display()));
                    return false;
                }
            }
        }
    }

    fn try_load(&mut self, path: &Path) -> EngineResult<()> {
        self.ensure_engine()?;
        self.generation += 1;
        let sink = EventSink {
            generation: self.generation,
            tx: self.events_tx.clone(),
        };
        let engine = self.engine.as_mut().ok_or("playback engine unavailable")?;
        engine.unsubscribe();
        engine.subscribe(sink);
        engine.load(path)
    }

    pub fn toggle_play(&mut self) {
        self.process_events();
        if !self.state.loaded || self.state.has_error {
            return;
        }

        if self.state.playing {
            match self.with_engine(|engine| engine.pause()) {
                Ok(()) => self.state.playing = false,
                Err(e) => return self.fail(format!("Could not pause: {e}")),
            }
        } else {
            if self.policy.reload_on_stale_resume
                && self.state.position.is_zero()
                && self.state.duration.is_zero()
                && let Some(path) = self.state.current_file_path.clone()
            {
                log::info!("Engine reports no position or duration, reloading before play");
                if !self.load(&path) {
                    return;
                }
            }
            match self.with_engine(|engine| engine.play()) {
                Ok(()) => self.state.playing = true,
                Err(e) => return self.fail(format!("Could not start playback: {e}")),
            }
        }
        self.notify();
    }

    pub fn seek_to(&mut self, position: Duration) {
        if !self.state.loaded {
            return;
        }
        let position = if self.state.duration.is_zero() {
            position
        } else {
            position.min(self.state.duration)
        };

        match self.with_engine(|engine| engine.seek(position)) {
            Ok(()) => {
                self.state.position = position;
                self.notify();
            }
            Err(e) => self.fail(format!("Could not seek: {e}")),
        }
    }

    pub fn seek_by_percentage(&mut self, fraction: f64) {
        if !self.state.loaded || self.state.duration.is_zero() || fraction.is_nan() {
            return;
        }
        let target = self.state.duration.mul_f64(fraction.clamp(0.0, 1.0));
        self.seek_to(target);
    }

    /// Rebuild the engine and reload the last file. This is the only way out
    /// of the error state.
    pub fn repair(&mut self) -> bool {
        log::info!("Repairing playback engine");
        self.teardown_engine();
        self.state.loaded = false;
        self.state.playing = false;

        if let Err(e) = self.ensure_engine() {
            self.fail(format!("Could not recreate playback engine: {e}"));
            return false;
        }

        if !self.policy.repair_delay.is_zero() {
            thread::sleep(self.policy.repair_delay);
        }

        match self.state.current_file_path.clone() {
            Some(path) => self.load(&path),
            None => {
                self.state.has_error = false;
                self.state.error_message.clear();
                self.notify();
                true
            }
        }
    }

    /// Apply everything the current engine reported since the last call.
    /// Events from superseded generations are dropped.
    pub fn process_events(&mut self) {
        let mut changed = false;
        while let Ok((generation, event)) = self.events_rx.try_recv() {
            if generation != self.generation {
                log::debug!("Dropping {event:?} from stale generation {generation}");
                continue;
            }
            self.apply_event(event);
            changed = true;
        }
        if changed {
            self.notify();
        }
    }

    fn apply_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::StateChanged { playing } => {
                if self.state.loaded && !self.state.has_error {
                    self.state.playing = playing;
                }
            }
            EngineEvent::DurationChanged(duration) => self.state.duration = duration,
            EngineEvent::PositionChanged(position) => self.state.position = position,
            EngineEvent::Completed => {
                log::debug!("Track finished, rewinding");
                // Pause first: seeking a drained engine may re-queue the track
                let rewound = self.with_engine(|engine| {
                    engine.pause()?;
                    engine.seek(Duration::ZERO)
                });
                if let Err(e) = rewound {
                    log::warn!("Could not rewind after completion: {e}");
                }
                self.state.position = Duration::ZERO;
                self.state.playing = false;
            }
        }
    }

    /// Release the engine. Safe to call repeatedly or with no engine.
    pub fn dispose(&mut self) {
        self.teardown_engine();
        self.state.loaded = false;
        self.state.playing = false;
    }

    fn ensure_engine(&mut self) -> EngineResult<()> {
        if self.engine.is_none() {
            log::debug!("Creating playback engine");
            self.engine = Some(self.factory.create()?);
        }
        Ok(())
    }

    fn teardown_engine(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.unsubscribe();
            log::debug!("Released playback engine");
        }
        // Anything still queued from the old engine is now stale
        self.generation += 1;
    }

    fn with_engine<R>(
        &mut self,
        action: impl FnOnce(&mut F::Engine) -> EngineResult<R>,
    ) -> EngineResult<R> {
        match self.engine.as_mut() {
            Some(engine) => action(engine),
            None => Err("no playback engine".into()),
        }
    }

    fn fail(&mut self, message: String) {
        log::error!("{message}");
        self.state.has_error = true;
        self.state.error_message = message;
        self.state.playing = false;
        self.notify();
    }

    fn notify(&mut self) {
        self.listeners.emit(&self.state);
    }
}

impl<F: EngineFactory> Drop for PlaybackController<F> {
    fn drop(&mut self) {
        self.dispose();
    }
}
