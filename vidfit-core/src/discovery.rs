//! Discovery of input videos and their sidecar subtitle files.
//!
//! The input directory is searched recursively. Results are sorted by
//! case-insensitive file name so interrupted runs resume in a stable order.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{CoreError, CoreResult};

/// Extensions recognized as video input, matched case-insensitively.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "mov", "avi", "flv", "wmv", "webm", "mpeg",
];

/// Whether the path has a recognized video extension.
#[must_use]
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Finds video files eligible for processing under `input_dir`.
///
/// Searches recursively and returns the matches sorted by case-insensitive
/// file name. Returns [`CoreError::NoFilesFound`] when nothing matches.
pub fn find_videos(input_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(input_dir) {
        let entry = entry?;
        if entry.file_type().is_file() && is_video_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(CoreError::NoFilesFound);
    }

    files.sort_by_key(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });
    Ok(files)
}

/// Looks for a subtitle file paired with a video by base name.
///
/// A `.srt` next to the video with the same stem is the only pairing
/// recognized; presence is purely observational.
#[must_use]
pub fn find_subtitle(video_path: &Path) -> Option<PathBuf> {
    let srt_path = video_path.with_extension("srt");
    srt_path.exists().then_some(srt_path)
}
