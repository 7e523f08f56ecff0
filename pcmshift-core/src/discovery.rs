//! File discovery module for finding video files to process.
//!
//! Scans the top level of a directory (no recursion) for regular files whose
//! extension matches a fixed list of video containers, case-insensitively.
//! Entries are yielded lazily in directory-listing order.

use crate::error::CoreResult;

use std::fs::ReadDir;
use std::path::{Path, PathBuf};

/// Video container extensions picked up by discovery (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["mp4", "mov", "avi", "mkv", "webm"];

/// A discovered input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Path to the file, as listed under the input directory
    pub path: PathBuf,
    /// File name without its final extension
    pub base_name: String,
    /// Extension as found on disk (original case preserved)
    pub extension: String,
}

impl MediaFile {
    /// Builds a MediaFile from a path whose extension is on the allow-list.
    /// Returns `None` for any other path.
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_string();
        if !is_supported_extension(&extension) {
            return None;
        }
        let base_name = path.file_stem()?.to_string_lossy().into_owned();
        Some(Self {
            path,
            base_name,
            extension,
        })
    }

    /// File name for log lines.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Returns true when `ext` (without the dot) names a supported container.
#[must_use]
pub fn is_supported_extension(ext: &str) -> bool {
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| ext.eq_ignore_ascii_case(supported))
}

/// Lazy, single-pass sequence of media files in one directory.
#[derive(Debug)]
pub struct MediaFiles {
    entries: ReadDir,
}

impl Iterator for MediaFiles {
    type Item = MediaFile;

    fn next(&mut self) -> Option<MediaFile> {
        for entry in self.entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::debug!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();

            // Follows symlinks: broken links, directories and device files fall out here.
            if !path.is_file() {
                continue;
            }

            if let Some(file) = MediaFile::from_path(path) {
                return Some(file);
            }
        }
        None
    }
}

/// Starts a scan of `input_dir` for video files eligible for processing.
///
/// An empty result is not an error. Fails only when the directory itself
/// cannot be read.
///
/// # Examples
///
/// ```rust,no_run
/// use pcmshift_core::discover_media_files;
/// use std::path::Path;
///
/// for file in discover_media_files(Path::new("/path/to/videos")).unwrap() {
///     println!("{} ({})", file.path.display(), file.extension);
/// }
/// ```
pub fn discover_media_files(input_dir: &Path) -> CoreResult<MediaFiles> {
    let entries = std::fs::read_dir(input_dir)?;
    Ok(MediaFiles { entries })
}
