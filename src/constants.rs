//! Project-wide constants used across multiple modules.
//!
//! This module centralizes constant definitions to avoid duplication and ensure
//! consistency across the codebase.

/// Spinner animation characters for progress indicators
pub const SPINNER_CHARS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Duration assumed for a file whose length could not be probed
pub const DEFAULT_DURATION_SECONDS: f64 = 60.0;

/// Bitrate used when re-encoding the trimmed selection
pub const TARGET_BITRATE_KBPS: u32 = 192;

/// Extension of the files we select and produce
pub const MP3_EXTENSION: &str = "mp3";

/// Directories to skip when searching for source files
pub const SKIP_DIRECTORIES: &[&str] = &["node_modules", ".git", "temp"];

/// Error shown when extraction is requested before a file is picked
pub const NO_FILE_SELECTED: &str = "Please select an MP3 file first";
