// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sibling `<file>.backup` copies kept for the duration of a commit.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::StoreError;

/// Suffix appended to the target path to name its backup.
pub const BACKUP_SUFFIX: &str = ".backup";

/// Returns `<path>.backup`.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Creates, restores and removes backup copies.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackupManager;

impl BackupManager {
    /// Copies `path` to its backup location.
    ///
    /// Returns `None` when `path` does not exist: there is nothing to protect.
    /// An existing backup is never overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BackupExists`] if a backup is already on disk and
    /// [`StoreError::Io`] if the existence check or the copy fails.
    pub fn backup(&self, path: &Path) -> Result<Option<PathBuf>, StoreError> {
        match fs::metadata(path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no backup needed, file does not exist");
                return Ok(None);
            }
            Err(e) => return Err(StoreError::io(path, e)),
        }

        let backup = backup_path(path);
        match fs::symlink_metadata(&backup) {
            Ok(_) => return Err(StoreError::backup_exists(&backup)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io(&backup, e)),
        }

        fs::copy(path, &backup).map_err(|e| StoreError::io(&backup, e))?;
        debug!(backup = %backup.display(), "backup created");
        Ok(Some(backup))
    }

    /// Copies `backup` back onto `path`, then deletes `backup`.
    ///
    /// Failing to delete the backup after a successful copy is only logged:
    /// the data is safe at that point.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BackupMissing`] if `backup` does not exist and
    /// [`StoreError::Io`] if the copy fails.
    pub fn restore(&self, backup: &Path, path: &Path) -> Result<(), StoreError> {
        if !backup.exists() {
            return Err(StoreError::backup_missing(backup));
        }

        fs::copy(backup, path).map_err(|e| StoreError::io(path, e))?;

        if let Err(e) = fs::remove_file(backup) {
            warn!(
                backup = %backup.display(),
                error = %e,
                "restored from backup but could not remove it"
            );
        }
        debug!(path = %path.display(), "restored from backup");
        Ok(())
    }

    /// Deletes `backup`; an already missing file counts as success.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] for any removal failure other than
    /// `NotFound`.
    pub fn discard(&self, backup: &Path) -> Result<(), StoreError> {
        match fs::remove_file(backup) {
            Ok(()) => {
                debug!(backup = %backup.display(), "backup removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(backup, e)),
        }
    }
}
