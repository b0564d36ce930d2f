use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ErrorContext, GoboError, Result};

/// Filesystem relocation primitives the snapshot engine sequences.
///
/// All destinations are full target paths, never "into this directory".
pub trait Transfer {
    /// Move a file or directory tree, replacing whatever sits at `to`.
    fn move_path(&self, from: &Path, to: &Path) -> Result<()>;

    /// Recursively copy a directory tree, merging into `to` if it exists.
    fn copy_dir(&self, from: &Path, to: &Path) -> Result<()>;

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;

    /// Remove a file or directory tree; a missing path is not an error.
    fn remove_tree(&self, path: &Path) -> Result<()>;
}

/// [`Transfer`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsTransfer;

impl Transfer for FsTransfer {
    fn move_path(&self, from: &Path, to: &Path) -> Result<()> {
        if fs::symlink_metadata(from).is_err() {
            return Err(GoboError::NotFound {
                resource: "path".to_string(),
                identifier: from.display().to_string(),
            });
        }

        self.remove_tree(to)?;
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)
                .with_io_context(|| format!("creating directory {}", parent.display()))?;
        }

        debug!("moving {} to {}", from.display(), to.display());
        if fs::rename(from, to).is_ok() {
            return Ok(());
        }

        // rename fails across filesystems; fall back to copy and delete
        if from.is_dir() {
            self.copy_dir(from, to)?;
        } else {
            self.copy_file(from, to)?;
        }
        self.remove_tree(from)
    }

    fn copy_dir(&self, from: &Path, to: &Path) -> Result<()> {
        if !from.is_dir() {
            return Err(GoboError::NotFound {
                resource: "directory".to_string(),
                identifier: from.display().to_string(),
            });
        }

        debug!("copying {} to {}", from.display(), to.display());
        fs::create_dir_all(to).with_io_context(|| format!("creating directory {}", to.display()))?;

        for entry in WalkDir::new(from).min_depth(1).follow_links(false) {
            let entry = entry.map_err(|e| GoboError::Generic {
                message: format!("failed walking {}: {}", from.display(), e),
                source: Some(Box::new(e)),
            })?;
            let relative = entry.path().strip_prefix(from).map_err(|e| GoboError::Generic {
                message: format!("{} is outside {}", entry.path().display(), from.display()),
                source: Some(Box::new(e)),
            })?;
            let target = to.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&target)
                    .with_io_context(|| format!("creating directory {}", target.display()))?;
            } else if file_type.is_symlink() {
                copy_symlink(entry.path(), &target)?;
            } else {
                fs::copy(entry.path(), &target).with_io_context(|| {
                    format!(
                        "copying file from {} to {}",
                        entry.path().display(),
                        target.display()
                    )
                })?;
            }
        }

        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)
                .with_io_context(|| format!("creating directory {}", parent.display()))?;
        }
        fs::copy(from, to).with_io_context(|| {
            format!("copying file from {} to {}", from.display(), to.display())
        })?;
        Ok(())
    }

    fn remove_tree(&self, path: &Path) -> Result<()> {
        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(_) => return Ok(()),
        };

        debug!("removing {}", path.display());
        if meta.is_dir() {
            fs::remove_dir_all(path)
                .with_io_context(|| format!("removing directory {}", path.display()))
        } else {
            fs::remove_file(path).with_io_context(|| format!("removing file {}", path.display()))
        }
    }
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    let target =
        fs::read_link(from).with_io_context(|| format!("reading symlink {}", from.display()))?;
    if fs::symlink_metadata(to).is_ok() {
        fs::remove_file(to).with_io_context(|| format!("replacing {}", to.display()))?;
    }
    std::os::unix::fs::symlink(&target, to)
        .with_io_context(|| format!("creating symlink {}", to.display()))
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    if from.is_dir() {
        FsTransfer.copy_dir(from, to)
    } else {
        FsTransfer.copy_file(from, to)
    }
}
