//! Directory scanning for MP3 files, used to populate the file picker.
//!
//! Subdirectories are scanned in parallel with rayon, so the raw traversal
//! order is not deterministic. [`collect_mp3_files`] sorts its result.

use rayon::prelude::*;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{MP3_EXTENSION, SKIP_DIRECTORIES};

/// Check if a file or directory is hidden (starts with '.')
pub fn is_hidden_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Check if a directory should be skipped during traversal
pub fn should_skip_directory(name: &str) -> bool {
    SKIP_DIRECTORIES.contains(&name)
}

pub fn is_mp3(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(MP3_EXTENSION))
        .unwrap_or(false)
}

/// Collect every MP3 below `dir`, sorted by path.
///
/// Subdirectories that cannot be read are logged and skipped; only a failure
/// to read `dir` itself is an error.
pub fn collect_mp3_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut files = Vec::new();
    scan_directory(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), Box<dyn Error>> {
    let entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;

    let mut directories = Vec::new();

    for entry in entries {
        let path = entry.path();

        if is_hidden_file(&path) {
            continue;
        }

        if path.is_dir() {
            let Some(dir_name) = path.file_name() else {
                continue;
            };
            if !should_skip_directory(&dir_name.to_string_lossy()) {
                directories.push(path);
            }
        } else if path.is_file() && is_mp3(&path) {
            files.push(path);
        }
    }

    if directories.len() > 1 {
        let nested: Vec<Vec<PathBuf>> = directories
            .par_iter()
            .filter_map(|subdir| {
                let mut found = Vec::new();
                match scan_directory(subdir, &mut found) {
                    Ok(()) => Some(found),
                    Err(e) => {
                        log::warn!("Failed to scan directory '{}': {e}", subdir.display());
                        None
                    }
                }
            })
            .collect();

        for found in nested {
            files.extend(found);
        }
    } else {
        for subdir in directories {
            if let Err(e) = scan_directory(&subdir, files) {
                log::warn!("Failed to scan directory '{}': {e}", subdir.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_hidden_file() {
        assert!(is_hidden_file(Path::new(".hidden")));
        assert!(is_hidden_file(Path::new("/path/.hidden")));
        assert!(!is_hidden_file(Path::new("visible")));
    }

    #[test]
    fn test_is_mp3() {
        assert!(is_mp3(Path::new("song.mp3")));
        assert!(is_mp3(Path::new("SONG.MP3")));
        assert!(!is_mp3(Path::new("song.wav")));
        assert!(!is_mp3(Path::new("mp3")));
    }

    #[test]
    fn test_collect_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(collect_mp3_files(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_collect_only_mp3() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.mp3"), b"fake").unwrap();
        fs::write(temp_dir.path().join("a.mp3"), b"fake").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), b"fake").unwrap();
        fs::write(temp_dir.path().join("take.wav"), b"fake").unwrap();

        let files = collect_mp3_files(temp_dir.path()).unwrap();
        assert_eq!(
            files,
            vec![temp_dir.path().join("a.mp3"), temp_dir.path().join("b.mp3")]
        );
    }

    #[test]
    fn test_collect_nested_and_skipped() {
        let temp_dir = TempDir::new().unwrap();
        for dir in ["albums", "singles", "node_modules", ".cache"] {
            fs::create_dir(temp_dir.path().join(dir)).unwrap();
            fs::write(temp_dir.path().join(dir).join("track.mp3"), b"fake").unwrap();
        }
        fs::write(temp_dir.path().join(".hidden.mp3"), b"fake").unwrap();

        let files = collect_mp3_files(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("albums/track.mp3"));
        assert!(files[1].ends_with("singles/track.mp3"));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        assert!(collect_mp3_files(Path::new("/this/path/does/not/exist/12345")).is_err());
    }
}
