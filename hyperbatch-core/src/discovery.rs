//! File discovery module for finding video files to process.
//!
//! Searches the top level of a directory for files whose extension is one of
//! [`VALID_VIDEO_EXTENSIONS`] (case-insensitive) and returns them sorted by
//! file name, so a batch always runs in the same order.

use crate::config::VALID_VIDEO_EXTENSIONS;
use crate::error::{CoreError, CoreResult};

use std::path::{Path, PathBuf};

/// Returns true when `path` has a recognized video extension.
pub fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            VALID_VIDEO_EXTENSIONS
                .iter()
                .any(|valid| ext.eq_ignore_ascii_case(valid))
        })
}

/// Finds video files eligible for processing in the specified directory.
///
/// Subdirectories (including a previous run's output folder) are not searched.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - The discovered files, sorted by file name
/// * `Err(CoreError::DirectoryNotFound)` - If `input_dir` is not a directory
/// * `Err(CoreError::NoFilesFound)` - If no video files are found
/// * `Err(CoreError::Io)` - If the directory cannot be read
///
/// # Examples
///
/// ```rust,no_run
/// use hyperbatch_core::find_processable_files;
/// use std::path::Path;
///
/// match find_processable_files(Path::new("/path/to/videos")) {
///     Ok(files) => println!("Found {} video files", files.len()),
///     Err(e) => println!("Error finding video files: {}", e),
/// }
/// ```
pub fn find_processable_files(input_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        return Err(CoreError::DirectoryNotFound(input_dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            (path.is_file() && has_video_extension(&path)).then_some(path)
        })
        .collect();

    if files.is_empty() {
        return Err(CoreError::NoFilesFound);
    }

    // Case-insensitive by name, raw name as the tie-break
    files.sort_by_cached_key(|path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        (name.to_lowercase(), name)
    });
    log::debug!(
        "Discovered {} video file(s) in {}",
        files.len(),
        input_dir.display()
    );
    Ok(files)
}
