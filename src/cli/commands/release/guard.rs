//! Scoped change of the process working directory.

use crate::error::{ReleaseError, Result};
use std::path::{Path, PathBuf};

/// Switches into a directory and switches back on drop, on every exit path.
#[derive(Debug)]
pub struct WorkingDirectoryGuard {
    original: PathBuf,
}

impl WorkingDirectoryGuard {
    /// Remember the current directory and change into `target`
    pub fn enter(target: &Path) -> Result<Self> {
        let wrap = |source| ReleaseError::WorkingDirectory {
            path: target.to_path_buf(),
            source,
        };
        let original = std::env::current_dir().map_err(wrap)?;
        std::env::set_current_dir(target).map_err(wrap)?;
        log::debug!("Switched working directory to {}", target.display());
        Ok(Self { original })
    }
}

impl Drop for WorkingDirectoryGuard {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.original) {
            log::warn!(
                "Failed to restore working directory {}: {}",
                self.original.display(),
                e
            );
        }
    }
}
