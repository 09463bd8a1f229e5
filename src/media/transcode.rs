//! Trimming through the ffmpeg command line tool.
//!
//! The selection is always re-encoded with libmp3lame. Stream copying an MP3
//! cut leaves broken headers on some platforms, so `-c copy` is never used.

use std::error::Error;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use super::{TranscodeOutcome, TranscodeRequest, Transcoder};

#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    ffmpeg: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
        }
    }

    pub fn build_args(request: &TranscodeRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-hide_banner".into(), "-v".into(), "error".into()];
        // Overwrite without asking; the caller already chose the destination
        args.push("-y".into());
        args.push("-i".into());
        args.push(request.input.clone().into_os_string());
        args.push("-ss".into());
        args.push(format!("{:.3}", request.start_seconds).into());
        args.push("-to".into());
        args.push(format!("{:.3}", request.end_seconds).into());
        args.push("-vn".into());
        args.push("-codec:a".into());
        args.push("libmp3lame".into());
        args.push("-b:a".into());
        args.push(format!("{}k", request.bitrate_kbps).into());
        args.push(request.output.clone().into_os_string());
        args
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, request: &TranscodeRequest) -> Result<TranscodeOutcome, Box<dyn Error>> {
        let args = Self::build_args(request);
        log::info!(
            "Running {} {}",
            self.ffmpeg.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = Command::new(&self.ffmpeg)
            .args(&args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    format!(
                        "ffmpeg not found at '{}'. Install ffmpeg or set ffmpeg_path.",
                        self.ffmpeg.display()
                    )
                } else {
                    format!("Failed to launch '{}': {e}", self.ffmpeg.display())
                }
            })?;

        let diagnostic = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if output.status.success() {
            Ok(TranscodeOutcome {
                success: true,
                diagnostic,
            })
        } else {
            let code = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            log::error!("ffmpeg exited with {code}: {diagnostic}");
            Ok(TranscodeOutcome {
                success: false,
                diagnostic: format!("ffmpeg exited with code {code}: {diagnostic}"),
            })
        }
    }
}
