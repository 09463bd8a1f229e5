use owo_colors::OwoColorize;
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};

use trim_studio::config::Config;
use trim_studio::constants::DEFAULT_DURATION_SECONDS;
use trim_studio::media::FfmpegProbe;
use trim_studio::timecode;
use trim_studio::utils::progress::with_spinner;
use trim_studio::utils::validation::validate_path_exists;

#[derive(Debug, Serialize)]
struct ProbeReport {
    path: PathBuf,
    duration_seconds: f64,
    timecode: String,
    /// False when no tool could read the file and the default was used
    measured: bool,
}

impl ProbeReport {
    fn new(path: &Path, measured: Option<f64>) -> Self {
        let duration_seconds = measured.unwrap_or(DEFAULT_DURATION_SECONDS);
        Self {
            path: path.to_path_buf(),
            duration_seconds,
            timecode: timecode::format(duration_seconds),
            measured: measured.is_some(),
        }
    }
}

pub fn handle_probe(file: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let path = Path::new(file);
    validate_path_exists(path)?;

    let config = Config::load()?;
    let probe = FfmpegProbe::new(config.ffprobe(), config.ffmpeg());

    let measured = if json {
        probe.try_probe(path)
    } else {
        with_spinner(format!("Probing {}", path.display()), || {
            probe.try_probe(path)
        })
    };
    let report = ProbeReport::new(path, measured);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", "File:".bold(), report.path.display());
    println!(
        "{} {} ({:.3}s)",
        "Duration:".bold(),
        report.timecode.cyan(),
        report.duration_seconds
    );
    if !report.measured {
        println!(
            "{} could not read the duration, trimming will assume {}",
            "Warning:".yellow(),
            timecode::format(DEFAULT_DURATION_SECONDS)
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_with_measured_duration() {
        let report = ProbeReport::new(Path::new("a.mp3"), Some(125.25));
        assert!(report.measured);
        assert_eq!(report.timecode, "2:05.3");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["duration_seconds"], 125.25);
        assert_eq!(json["path"], "a.mp3");
    }

    #[test]
    fn test_report_falls_back_to_default() {
        let report = ProbeReport::new(Path::new("a.mp3"), None);
        assert!(!report.measured);
        assert_eq!(report.duration_seconds, 60.0);
        assert_eq!(report.timecode, "1:00.0");
    }
}
