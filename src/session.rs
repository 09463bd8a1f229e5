//! The currently selected audio file and its trim range.
//!
//! `AudioFileSession` is the only owner of the selection. Every edit to the
//! range goes through the checks in [`crate::trim`]; an edit that would break
//! `0 <= start < end <= duration` is dropped and the previous value stays.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crate::constants::DEFAULT_DURATION_SECONDS;
use crate::notify::Broadcast;
use crate::timecode;
use crate::trim::{self, TrimRange};

#[derive(Debug, Clone, PartialEq)]
pub struct AudioFile {
    pub path: Option<PathBuf>,
    pub display_name: Option<String>,
    pub duration_seconds: f64,
}

impl AudioFile {
    pub fn new(path: PathBuf, display_name: String, duration_seconds: f64) -> Self {
        Self {
            path: Some(path),
            display_name: Some(display_name),
            duration_seconds,
        }
    }

    pub fn is_selected(&self) -> bool {
        self.path.is_some() && self.display_name.is_some()
    }
}

impl Default for AudioFile {
    fn default() -> Self {
        Self {
            path: None,
            display_name: None,
            duration_seconds: DEFAULT_DURATION_SECONDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    FileSelected(AudioFile),
    RangeChanged(TrimRange),
}

pub struct AudioFileSession {
    file: AudioFile,
    range: TrimRange,
    events: Broadcast<SessionEvent>,
}

impl AudioFileSession {
    pub fn new() -> Self {
        let file = AudioFile::default();
        let range = TrimRange::full(file.duration_seconds);
        Self {
            file,
            range,
            events: Broadcast::new(),
        }
    }

    pub fn file(&self) -> &AudioFile {
        &self.file
    }

    pub fn range(&self) -> TrimRange {
        self.range
    }

    pub fn selected_path(&self) -> Option<&Path> {
        if self.file.is_selected() {
            self.file.path.as_deref()
        } else {
            None
        }
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Replace the selection and reset the range to the whole file.
    ///
    /// The reset does not go through the range checks since it establishes the
    /// baseline. A duration that is not a positive finite number is replaced by
    /// the default so that `start < end` holds from the start.
    pub fn select_file(&mut self, path: PathBuf, display_name: String, duration_seconds: f64) {
        let duration = if duration_seconds.is_finite() && duration_seconds > 0.0 {
            duration_seconds
        } else {
            log::warn!(
                "Ignoring unusable duration {duration_seconds} for {}",
                path.display()
            );
            DEFAULT_DURATION_SECONDS
        };

        self.file = AudioFile::new(path, display_name, duration);
        self.range = TrimRange::full(duration);

        log::info!(
            "Selected {} ({})",
            self.file.display_name.as_deref().unwrap_or_default(),
            timecode::format(duration)
        );
        self.events.emit(&SessionEvent::FileSelected(self.file.clone()));
    }

    /// Returns `false` when the value was rejected and the range kept.
    pub fn set_start(&mut self, value: f64) -> bool {
        if !trim::accept_start(value, self.range.end, self.file.duration_seconds) {
            log::debug!("Rejected start {value}, keeping {}", self.range.start);
            return false;
        }
        self.range.start = value;
        self.events.emit(&SessionEvent::RangeChanged(self.range));
        true
    }

    /// Returns `false` when the value was rejected and the range kept.
    pub fn set_end(&mut self, value: f64) -> bool {
        if !trim::accept_end(value, self.range.start, self.file.duration_seconds) {
            log::debug!("Rejected end {value}, keeping {}", self.range.end);
            return false;
        }
        self.range.end = value;
        self.events.emit(&SessionEvent::RangeChanged(self.range));
        true
    }

    pub fn set_start_text(&mut self, text: &str) -> bool {
        self.set_start(timecode::parse(text))
    }

    pub fn set_end_text(&mut self, text: &str) -> bool {
        self.set_end(timecode::parse(text))
    }
}

impl Default for AudioFileSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(duration: f64) -> AudioFileSession {
        let mut session = AudioFileSession::new();
        session.select_file(
            PathBuf::from("/music/song.mp3"),
            "song.mp3".to_string(),
            duration,
        );
        session
    }

    #[test]
    fn test_new_session_has_nothing_selected() {
        let session = AudioFileSession::new();
        assert!(!session.file().is_selected());
        assert!(session.selected_path().is_none());
        assert_eq!(session.file().duration_seconds, 60.0);
        assert_eq!(session.range(), TrimRange::full(60.0));
    }

    #[test]
    fn test_select_file_resets_range() {
        let mut session = session_with(120.0);
        assert_eq!(session.range(), TrimRange::full(120.0));

        assert!(session.set_start(10.0));
        assert!(session.set_end(50.0));

        session.select_file(PathBuf::from("/music/other.mp3"), "other.mp3".into(), 30.0);
        assert_eq!(session.range(), TrimRange::full(30.0));
        assert_eq!(session.selected_path(), Some(Path::new("/music/other.mp3")));
    }

    #[test]
    fn test_rejected_start_keeps_previous_value() {
        let mut session = session_with(120.0);

        assert!(!session.set_start(130.0));
        assert_eq!(session.range().start, 0.0);

        assert!(!session.set_start(-1.0));
        assert!(!session.set_start(120.0));
        assert_eq!(session.range().start, 0.0);
    }

    #[test]
    fn test_end_edits() {
        let mut session = session_with(120.0);

        assert!(session.set_end(60.0));
        assert_eq!(session.range().end, 60.0);

        assert!(session.set_start(30.0));
        assert!(!session.set_end(30.0));
        assert!(!session.set_end(121.0));
        assert_eq!(session.range(), TrimRange { start: 30.0, end: 60.0 });
    }

    #[test]
    fn test_text_edits_use_timecode_parsing() {
        let mut session = session_with(300.0);

        assert!(session.set_start_text("1:30"));
        assert!(session.set_end_text("2:45.5"));
        assert_eq!(session.range(), TrimRange { start: 90.0, end: 165.5 });

        // Half-typed input parses to zero, which is not a valid end
        assert!(!session.set_end_text(""));
        assert_eq!(session.range().end, 165.5);
    }

    #[test]
    fn test_unusable_duration_falls_back_to_default() {
        let session = session_with(0.0);
        assert_eq!(session.file().duration_seconds, 60.0);
        assert_eq!(session.range(), TrimRange::full(60.0));

        let session = session_with(f64::NAN);
        assert_eq!(session.range(), TrimRange::full(60.0));
    }

    #[test]
    fn test_notifications() {
        let mut session = AudioFileSession::new();
        let events = session.subscribe();

        session.select_file(PathBuf::from("/a.mp3"), "a.mp3".into(), 10.0);
        session.set_start(2.0);
        session.set_start(20.0);

        match events.try_recv().unwrap() {
            SessionEvent::FileSelected(file) => assert_eq!(file.duration_seconds, 10.0),
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::RangeChanged(TrimRange { start: 2.0, end: 10.0 })
        );
        // The rejected edit produced nothing
        assert!(events.try_recv().is_err());
    }
}
