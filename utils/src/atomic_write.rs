//! Crash-safe whole-file replacement.
//!
//! Bytes are written to a sibling temp file, fsynced, and renamed over the
//! target, so readers see either the previous document or the new one. Where
//! rename cannot replace an existing file (Windows), the old file is parked at
//! `<name>.bak` for the swap; [`recover_bak_file`] undoes an interrupted swap.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("bak")
}

/// Restore `<path>.bak` if a previous swap died between parking the old file
/// and moving the new one into place.
pub fn recover_bak_file(path: &Path) {
    let backup = backup_path(path);
    if path.exists() || !backup.exists() {
        return;
    }
    match fs::rename(&backup, path) {
        Ok(()) => tracing::warn!(path = %path.display(), "Restored file from interrupted write"),
        Err(e) => tracing::warn!(path = %path.display(), "Failed to restore .bak file: {e}"),
    }
}

/// Replace `path` with `bytes`, creating parent directories as needed.
pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;
    staged.as_file().sync_all()?;

    if let Err(err) = staged.persist(path) {
        if !path.exists() {
            return Err(err.error);
        }
        swap_via_backup(path, err.file)?;
    }

    sync_dir(dir);
    Ok(())
}

fn swap_via_backup(path: &Path, staged: NamedTempFile) -> io::Result<()> {
    let backup = backup_path(path);
    let _ = fs::remove_file(&backup);
    fs::rename(path, &backup)?;

    if let Err(err) = staged.persist(path) {
        let _ = fs::rename(&backup, path);
        return Err(err.error);
    }
    if let Err(e) = fs::remove_file(&backup) {
        tracing::warn!(path = %backup.display(), "Failed to remove .bak after write: {e}");
    }
    Ok(())
}

/// Best-effort fsync of the directory entry after a rename.
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        tracing::debug!(path = %dir.display(), "Directory sync failed: {e}");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
