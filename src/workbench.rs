//! Wires the session, extraction and playback together per user action.
//!
//! The workbench is what a front end drives. It owns one of each controller,
//! turns picker results into selections, composes output paths, and refuses
//! to start a second extraction while one is still processing.

use std::path::{Path, PathBuf};

use crate::extraction::{ExtractionController, ExtractionState};
use crate::media::{DurationProbe, Transcoder};
use crate::output;
use crate::playback::{EngineFactory, PlaybackController, RecoveryPolicy};
use crate::session::AudioFileSession;
use crate::timecode;

/// What a file picker hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedFile {
    pub path: PathBuf,
    pub display_name: String,
}

impl PickedFile {
    pub fn from_path(path: PathBuf) -> Self {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, display_name }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }
}

pub struct Workbench<P, T, F>
where
    P: DurationProbe,
    T: Transcoder,
    F: EngineFactory,
{
    probe: P,
    session: AudioFileSession,
    extraction: ExtractionController<T>,
    playback: PlaybackController<F>,
    status: Option<StatusMessage>,
}

impl<P, T, F> Workbench<P, T, F>
where
    P: DurationProbe,
    T: Transcoder,
    F: EngineFactory,
{
    pub fn new(probe: P, transcoder: T, factory: F, policy: RecoveryPolicy) -> Self {
        Self {
            probe,
            session: AudioFileSession::new(),
            extraction: ExtractionController::new(transcoder),
            playback: PlaybackController::new(factory, policy),
            status: None,
        }
    }

    pub fn session(&self) -> &AudioFileSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut AudioFileSession {
        &mut self.session
    }

    pub fn extraction(&self) -> &ExtractionController<T> {
        &self.extraction
    }

    pub fn extraction_mut(&mut self) -> &mut ExtractionController<T> {
        &mut self.extraction
    }

    pub fn playback(&self) -> &PlaybackController<F> {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackController<F> {
        &mut self.playback
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Take the picker's result. Returns whether a file is now selected.
    pub fn select_file(&mut self, picked: Option<PickedFile>) -> bool {
        let Some(picked) = picked else {
            self.status = Some(StatusMessage::info("No file selected"));
            return false;
        };

        let duration = self.probe.probe_duration(&picked.path);
        self.status = Some(StatusMessage::info(format!(
            "{} ({})",
            picked.display_name,
            timecode::format(duration)
        )));
        self.session
            .select_file(picked.path, picked.display_name, duration);
        true
    }

    pub fn set_start_text(&mut self, text: &str) -> bool {
        self.session.set_start_text(text)
    }

    pub fn set_end_text(&mut self, text: &str) -> bool {
        self.session.set_end_text(text)
    }

    /// Where the current selection would be written inside `directory`.
    pub fn planned_output(&self, directory: &Path) -> Option<PathBuf> {
        let source = self.session.selected_path()?;
        let range = self.session.range();
        Some(output::output_path(directory, source, range.start, range.end))
    }

    /// Extract the current range into `directory`, as returned by the output
    /// location chooser (`None` when the user cancelled).
    pub fn extract_to(&mut self, directory: Option<&Path>) -> &ExtractionState {
        if self.extraction.is_processing() {
            log::warn!("Extraction already in progress, ignoring request");
            return self.extraction.state();
        }

        let Some(directory) = directory else {
            self.status = Some(StatusMessage::info("Export cancelled"));
            return self.extraction.state();
        };

        let range = self.session.range();
        let input = self.session.selected_path();
        let destination = match input {
            Some(source) => output::output_path(directory, source, range.start, range.end),
            None => directory.to_path_buf(),
        };

        let state = self
            .extraction
            .request_extraction(input, range.start, range.end, &destination);

        self.status = Some(StatusMessage {
            kind: match state {
                ExtractionState::Success { .. } => StatusKind::Success,
                ExtractionState::Error { .. } => StatusKind::Error,
                _ => StatusKind::Info,
            },
            text: state.message(),
        });
        state
    }

    /// Load the last successful extraction into the player.
    pub fn load_result(&mut self) -> bool {
        match self.extraction.state() {
            ExtractionState::Success { output_path } => {
                let output_path = output_path.clone();
                self.playback.load(&output_path)
            }
            _ => false,
        }
    }

    /// Hand the player over to a front end that outlives the workbench.
    pub fn into_playback(self) -> PlaybackController<F> {
        self.playback
    }
}
