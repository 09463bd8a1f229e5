//! Path and input validation utilities.
//!
//! This module provides common validation functions to ensure consistent
//! error handling across the commands.

use owo_colors::OwoColorize;
use std::error::Error;
use std::path::Path;

use super::scan::is_mp3;

/// Validate that a path exists and return an error if it doesn't.
///
/// # Example
///
/// ```ignore
/// use crate::utils::validation::validate_path_exists;
/// use std::path::Path;
///
/// let path = Path::new("/some/path");
/// validate_path_exists(path)?;
/// ```
pub fn validate_path_exists(path: &Path) -> Result<(), Box<dyn Error>> {
    if !path.exists() {
        return Err(format!(
            "{} Path does not exist: {}",
            "Error:".red().bold(),
            path.display()
        )
        .into());
    }
    Ok(())
}

/// Validate that `path` is an existing MP3 file.
pub fn validate_mp3_file(path: &Path) -> Result<(), Box<dyn Error>> {
    validate_path_exists(path)?;
    if !path.is_file() || !is_mp3(path) {
        return Err(format!(
            "{} Not an MP3 file: {}",
            "Error:".red().bold(),
            path.display()
        )
        .into());
    }
    Ok(())
}

/// Validate that `path` is an existing directory.
pub fn validate_directory(path: &Path) -> Result<(), Box<dyn Error>> {
    validate_path_exists(path)?;
    if !path.is_dir() {
        return Err(format!(
            "{} Not a directory: {}",
            "Error:".red().bold(),
            path.display()
        )
        .into());
    }
    Ok(())
}
