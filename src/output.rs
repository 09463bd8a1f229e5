//! Naming of trimmed output files.
//!
//! The output goes into the directory the user picked, named
//! `<stem>_<start>_to_<end>.mp3`, with the timecodes written by
//! [`crate::timecode::format`] and made safe for file systems.

use std::path::{Path, PathBuf};

use crate::constants::MP3_EXTENSION;
use crate::timecode;

/// `1:05.0` becomes `1-05_0`.
pub fn filename_safe_timecode(seconds: f64) -> String {
    timecode::format(seconds).replace(':', "-").replace('.', "_")
}

pub fn derive_file_name(source: &Path, start: f64, end: f64) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "audio".to_string());

    format!(
        "{stem}_{}_to_{}.{MP3_EXTENSION}",
        filename_safe_timecode(start),
        filename_safe_timecode(end)
    )
}

pub fn output_path(directory: &Path, source: &Path, start: f64, end: f64) -> PathBuf {
    directory.join(derive_file_name(source, start, end))
}
