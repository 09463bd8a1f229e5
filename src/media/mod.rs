//! External media tooling: duration probing and transcoding.
//!
//! The trim workflow never decodes audio itself. It asks a [`DurationProbe`]
//! how long a file is and a [`Transcoder`] to write the trimmed copy. The
//! ffmpeg-backed implementations live in the submodules.

use std::error::Error;
use std::path::{Path, PathBuf};

pub mod probe;
pub mod transcode;

pub use probe::FfmpegProbe;
pub use transcode::FfmpegTranscoder;

pub trait DurationProbe {
    /// Total duration in seconds. Implementations return the 60 second default
    /// instead of failing.
    fn probe_duration(&self, path: &Path) -> f64;
}

/// One trim job: the closed interval `[start_seconds, end_seconds]` of `input`
/// re-encoded into `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub bitrate_kbps: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeOutcome {
    pub success: bool,
    /// Whatever the tool reported, kept verbatim for the user.
    pub diagnostic: String,
}

pub trait Transcoder {
    /// `Err` means the tool could not be run at all (spawn or I/O failure);
    /// a tool that ran and failed reports `Ok` with `success == false`.
    fn transcode(&self, request: &TranscodeRequest) -> Result<TranscodeOutcome, Box<dyn Error>>;
}
