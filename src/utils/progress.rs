//! Spinner helpers for long-running external tools.
//!
//! ffmpeg gives no progress we can rely on, so extraction and probing show a
//! spinner that ticks on its own thread while the caller blocks.

use crate::constants::SPINNER_CHARS;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a standard progress spinner with consistent styling.
///
/// # Example
///
/// ```ignore
/// use crate::utils::progress::create_progress_spinner;
///
/// let spinner = create_progress_spinner();
/// spinner.set_message("Extracting...");
/// // ... do work ...
/// spinner.finish_and_clear();
/// ```
pub fn create_progress_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} {elapsed:.bright_black}")
            .unwrap()
            .tick_strings(SPINNER_CHARS),
    );
    spinner
}

/// Run `work` with a ticking spinner showing `message`, clearing it afterwards.
pub fn with_spinner<R>(message: impl Into<String>, work: impl FnOnce() -> R) -> R {
    let spinner = create_progress_spinner();
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    let result = work();
    spinner.finish_and_clear();
    result
}
