//! Content file discovery

use walkdir::WalkDir;

use crate::{Error, NormalizedPath, Result};

/// Recursively list every file below `root`.
///
/// The result is sorted so repeated runs see files in the same order,
/// whatever order the filesystem hands out directory entries in.
/// Symlinked files are included; symlinked directories are not followed.
pub fn discover_files(root: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    let native_root = root.to_native();
    let mut files = Vec::new();

    for entry in WalkDir::new(&native_root).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map_or_else(|| native_root.clone(), |p| p.to_path_buf());
            Error::io(path, e.into())
        })?;

        let file_type = entry.file_type();
        if file_type.is_file() {
            files.push(NormalizedPath::new(entry.path()));
        } else if file_type.is_symlink() {
            if entry.path().is_file() {
                files.push(NormalizedPath::new(entry.path()));
            } else {
                tracing::debug!(path = %entry.path().display(), "not following directory symlink");
            }
        }
    }

    files.sort();
    Ok(files)
}
