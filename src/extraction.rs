//! Lifecycle of a single "extract the selection" action.
//!
//! The controller moves `Idle -> Processing -> Success | Error` around one
//! transcoder call and never hands an error back to its caller: every failure
//! becomes an `Error` state with a message for the user.
//!
//! There is no locking here. Only one extraction per controller may be in
//! flight, and it is up to the caller to not start another while
//! [`ExtractionController::is_processing`] is true.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crate::constants::{NO_FILE_SELECTED, TARGET_BITRATE_KBPS};
use crate::media::{TranscodeRequest, Transcoder};
use crate::notify::Broadcast;

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionState {
    Idle,
    Processing,
    Success { output_path: PathBuf },
    Error { message: String },
}

impl ExtractionState {
    pub fn message(&self) -> String {
        match self {
            ExtractionState::Idle => "Ready".to_string(),
            ExtractionState::Processing => "Extracting audio...".to_string(),
            ExtractionState::Success { output_path } => {
                format!("Saved trimmed audio to {}", output_path.display())
            }
            ExtractionState::Error { message } => message.clone(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExtractionState::Success { .. } | ExtractionState::Error { .. }
        )
    }
}

pub struct ExtractionController<T: Transcoder> {
    transcoder: T,
    state: ExtractionState,
    events: Broadcast<ExtractionState>,
}

impl<T: Transcoder> ExtractionController<T> {
    pub fn new(transcoder: T) -> Self {
        Self {
            transcoder,
            state: ExtractionState::Idle,
            events: Broadcast::new(),
        }
    }

    pub fn state(&self) -> &ExtractionState {
        &self.state
    }

    pub fn is_processing(&self) -> bool {
        self.state == ExtractionState::Processing
    }

    pub fn transcoder(&self) -> &T {
        &self.transcoder
    }

    /// Receives every state the controller moves through, `Processing` included.
    pub fn subscribe(&mut self) -> mpsc::Receiver<ExtractionState> {
        self.events.subscribe()
    }

    /// Trim `[start, end]` of `input` into `output`.
    pub fn request_extraction(
        &mut self,
        input: Option<&Path>,
        start: f64,
        end: f64,
        output: &Path,
    ) -> &ExtractionState {
        let Some(input) = input else {
            self.transition(ExtractionState::Error {
                message: NO_FILE_SELECTED.to_string(),
            });
            return &self.state;
        };

        self.transition(ExtractionState::Processing);

        let request = TranscodeRequest {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            start_seconds: start,
            end_seconds: end,
            bitrate_kbps: TARGET_BITRATE_KBPS,
        };

        let next = match self.transcoder.transcode(&request) {
            Ok(outcome) if outcome.success => {
                log::info!("Extraction finished: {}", output.display());
                ExtractionState::Success {
                    output_path: output.to_path_buf(),
                }
            }
            Ok(outcome) => ExtractionState::Error {
                message: format!("Extraction failed.\n{}", outcome.diagnostic),
            },
            Err(e) => {
                log::error!("Transcoder could not run: {e}");
                ExtractionState::Error {
                    message: format!("Extraction failed: {e}"),
                }
            }
        };

        self.transition(next);
        &self.state
    }

    pub fn reset(&mut self) {
        self.transition(ExtractionState::Idle);
    }

    fn transition(&mut self, next: ExtractionState) {
        log::debug!("Extraction state: {:?} -> {:?}", self.state, next);
        self.state = next;
        self.events.emit(&self.state);
    }
}
