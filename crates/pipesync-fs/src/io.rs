//! Descriptor file reads and crash-safe writes

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Replace `path` with `content` so readers see either the old file or the
/// new one, never a partial write.
///
/// The bytes go to a hidden sibling file that is locked, flushed to disk and
/// then renamed over the target. The sibling is removed again if any step
/// after its creation fails.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let target = path.to_native();

    if let Some(dir) = target.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }

    let staging = staging_path(&target);
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&staging)
        .map_err(|e| Error::io(&staging, e))?;

    let outcome = fill_staging(file, &staging, &target, content).and_then(|()| {
        fs::rename(&staging, &target).map_err(|e| Error::io(&target, e))
    });
    if outcome.is_err() {
        let _ = fs::remove_file(&staging);
        return outcome;
    }

    tracing::debug!(path = %path, bytes = content.len(), "wrote file atomically");
    Ok(())
}

/// `.<name>.<pid>.tmp` next to `target`.
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

fn fill_staging(mut file: File, staging: &Path, target: &Path, content: &[u8]) -> Result<()> {
    let lock_failed = || Error::LockFailed {
        path: target.to_path_buf(),
    };

    file.lock_exclusive().map_err(|_| lock_failed())?;
    file.write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| Error::io(staging, e))?;
    file.unlock().map_err(|_| lock_failed())
}

/// Read a whole text file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native = path.to_native();
    fs::read_to_string(&native).map_err(|e| Error::io(&native, e))
}

/// [`write_atomic`] for text.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}
