//! Output path resolution.
//!
//! Every output lands in a fixed-name folder next to its input and keeps the
//! input's file name: `<dir>/clip.mp4` becomes `<dir>/Output/clip.mp4`.

use crate::error::{CoreError, CoreResult};
use crate::utils::get_filename_safe;

use std::fs;
use std::path::{Path, PathBuf};

/// Resolves the output path for `input` under the `subdir` folder.
///
/// Pure; nothing is created on disk.
pub fn resolve_output_path(input: &Path, subdir: &str) -> CoreResult<PathBuf> {
    let file_name = get_filename_safe(input)?;
    let parent = input.parent().unwrap_or_else(|| Path::new(""));
    Ok(parent.join(subdir).join(file_name))
}

/// Creates the folder that will hold `output`. Succeeds if it already exists.
pub fn ensure_output_dir(output: &Path) -> CoreResult<()> {
    let dir = output.parent().ok_or_else(|| {
        CoreError::PathError(format!("Output path {} has no parent directory", output.display()))
    })?;

    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(dir).map_err(|e| {
        CoreError::PathError(format!(
            "Failed to create output directory {}: {}",
            dir.display(),
            e
        ))
    })?;
    log::debug!("Created output directory {}", dir.display());
    Ok(())
}
