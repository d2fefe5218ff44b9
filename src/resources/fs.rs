//! Filesystem helpers: backups, recursive copies, safe removal.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

/// Timestamp suffix used for backup paths (`YYYYmmddHHMMSS`).
#[must_use]
pub fn backup_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d%H%M%S").to_string()
}

/// Compute the backup sibling for `path`: `<name>.bak.<ts>` next to it.
#[must_use]
pub fn backup_path(path: &Path, timestamp: &str) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "backup".to_string(), |n| n.to_string_lossy().to_string());
    path.with_file_name(format!("{name}.bak.{timestamp}"))
}

/// Copy `path` (file or directory) to its timestamped backup sibling.
///
/// Returns the backup path. The original is left untouched so the caller
/// can still overwrite or remove it afterwards. A second backup within
/// the same second gets a numeric suffix instead of overwriting the first.
///
/// # Errors
///
/// Returns an error if the copy fails.
pub fn create_backup(path: &Path, timestamp: &str) -> Result<PathBuf> {
    let mut dest = backup_path(path, timestamp);
    let mut n = 1;
    while dest.symlink_metadata().is_ok() {
        dest = backup_path(path, &format!("{timestamp}.{n}"));
        n += 1;
    }
    if path.is_dir() {
        copy_dir_recursive(path, &dest)
            .with_context(|| format!("back up directory {}", path.display()))?;
    } else {
        std::fs::copy(path, &dest)
            .with_context(|| format!("back up file {}", path.display()))?;
    }
    Ok(dest)
}

/// Recursively copy a directory tree.
///
/// Symlinks within the source tree are *followed*: the function uses
/// [`Path::is_dir`] (which follows symlinks) so directory symlinks are
/// recursed into and their contents materialised rather than copying the
/// link itself.
///
/// # Errors
///
/// Returns an error if any directory or file cannot be copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)
        .with_context(|| format!("creating directory {}", dst.display()))?;
    for entry in
        std::fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", src.display()))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path).with_context(|| {
                format!("copying {} to {}", src_path.display(), dst_path.display())
            })?;
        }
    }
    Ok(())
}

/// Create the parent directory of `path` if it does not exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Whether `path` names an existing filesystem entry, without following
/// symlinks (a dangling symlink still counts as present).
#[must_use]
pub fn entry_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Remove the file or symlink at `path`.
///
/// # Errors
///
/// Returns an error if `path` is a real directory or removal fails.
pub fn remove_file_or_link(path: &Path) -> Result<()> {
    let meta = std::fs::symlink_metadata(path)
        .with_context(|| format!("stat {}", path.display()))?;
    if meta.is_dir() {
        anyhow::bail!("refusing to remove directory as file: {}", path.display());
    }
    std::fs::remove_file(path).with_context(|| format!("remove {}", path.display()))?;
    Ok(())
}

/// Remove the directory at `path` if it is empty.
///
/// Returns `true` when the directory was removed, `false` when it was kept
/// because it still has contents.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or removed.
pub fn remove_dir_if_empty(path: &Path) -> Result<bool> {
    let mut entries =
        std::fs::read_dir(path).with_context(|| format!("read {}", path.display()))?;
    if entries.next().is_some() {
        return Ok(false);
    }
    std::fs::remove_dir(path).with_context(|| format!("remove {}", path.display()))?;
    Ok(true)
}
