//! Duration probing through ffprobe, with an `ffmpeg -i` fallback.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::DurationProbe;
use crate::constants::DEFAULT_DURATION_SECONDS;

#[derive(Debug, Clone)]
pub struct FfmpegProbe {
    ffprobe: PathBuf,
    ffmpeg: PathBuf,
}

impl FfmpegProbe {
    pub fn new(ffprobe: impl Into<PathBuf>, ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe: ffprobe.into(),
            ffmpeg: ffmpeg.into(),
        }
    }

    /// Probe without applying the default, for callers that would rather know.
    pub fn try_probe(&self, path: &Path) -> Option<f64> {
        self.probe_with_ffprobe(path)
            .or_else(|| self.probe_with_ffmpeg(path))
    }

    fn probe_with_ffprobe(&self, path: &Path) -> Option<f64> {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
                "-sexagesimal",
            ])
            .arg(path)
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                log::warn!("Could not run {}: {e}", self.ffprobe.display());
                return None;
            }
        };

        if !output.status.success() {
            log::warn!(
                "ffprobe failed for {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        parse_duration_text(&String::from_utf8_lossy(&output.stdout))
    }

    fn probe_with_ffmpeg(&self, path: &Path) -> Option<f64> {
        // Without an output file ffmpeg exits non-zero, but still prints the
        // input summary to stderr.
        let output = Command::new(&self.ffmpeg)
            .arg("-hide_banner")
            .arg("-i")
            .arg(path)
            .output();

        match output {
            Ok(output) => find_duration_line(&String::from_utf8_lossy(&output.stderr)),
            Err(e) => {
                log::warn!("Could not run {}: {e}", self.ffmpeg.display());
                None
            }
        }
    }
}

impl Default for FfmpegProbe {
    fn default() -> Self {
        Self::new("ffprobe", "ffmpeg")
    }
}

impl DurationProbe for FfmpegProbe {
    fn probe_duration(&self, path: &Path) -> f64 {
        match self.try_probe(path) {
            Some(seconds) => {
                log::debug!("Probed {}: {seconds}s", path.display());
                seconds
            }
            None => {
                log::warn!(
                    "Using default duration of {DEFAULT_DURATION_SECONDS}s for {}",
                    path.display()
                );
                DEFAULT_DURATION_SECONDS
            }
        }
    }
}

/// Parse either `hh:mm:ss.frac` or plain seconds. Only positive finite
/// durations are accepted.
pub fn parse_duration_text(text: &str) -> Option<f64> {
    let text = text.trim();

    let seconds = if text.contains(':') {
        let parts: Vec<&str> = text.split(':').collect();
        let [hours, minutes, seconds] = parts.as_slice() else {
            return None;
        };
        hours.trim().parse::<f64>().ok()? * 3600.0
            + minutes.trim().parse::<f64>().ok()? * 60.0
            + seconds.trim().parse::<f64>().ok()?
    } else {
        text.parse::<f64>().ok()?
    };

    (seconds.is_finite() && seconds > 0.0).then_some(seconds)
}

/// Extract the duration from the `Duration: 00:03:25.12, start: ...` line that
/// ffmpeg prints for its inputs.
pub fn find_duration_line(stderr: &str) -> Option<f64> {
    stderr.lines().find_map(|line| {
        let rest = line.trim_start().strip_prefix("Duration:")?;
        let value = rest.split(',').next()?;
        parse_duration_text(value)
    })
}
