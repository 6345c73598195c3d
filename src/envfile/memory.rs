// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory [`EnvStore`] for tests and library callers that must not
//! touch the filesystem.
//!
//! Files are kept as serialized text so byte-level assertions hold exactly
//! as they would on disk. `fail_writes` injects a write failure after the
//! backup step.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use super::EnvMap;
use super::backup::backup_path;
use super::codec;
use super::store::{EnvStore, Snapshot};
use crate::error::{CommitError, StoreError};

/// Fake store holding file contents in a map.
#[derive(Debug, Default)]
pub struct MemoryEnvStore {
    files: RefCell<HashMap<PathBuf, String>>,
    fail_writes: Cell<bool>,
    commits: Cell<usize>,
}

impl MemoryEnvStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `path` with raw file text.
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.borrow_mut().insert(path.into(), text.into());
    }

    /// Raw text currently stored at `path`.
    #[must_use]
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    /// Makes every following write fail with `StorageFull`.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of commits attempted so far.
    #[must_use]
    pub fn commit_count(&self) -> usize {
        self.commits.get()
    }

    fn write(&self, path: &Path, content: String) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::io(
                path,
                io::Error::from(io::ErrorKind::StorageFull),
            ));
        }
        self.files.borrow_mut().insert(path.to_path_buf(), content);
        Ok(())
    }
}

impl EnvStore for MemoryEnvStore {
    fn read(&self, path: &Path) -> Result<Snapshot, StoreError> {
        Ok(self.contents(path).map_or_else(Snapshot::default, |text| {
            let parsed = codec::parse(&text);
            Snapshot {
                entries: parsed.entries,
                existed: true,
                warnings: parsed.warnings,
            }
        }))
    }

    fn commit(&self, path: &Path, entries: &EnvMap) -> Result<(), CommitError> {
        self.commits.set(self.commits.get() + 1);
        let target = path.display().to_string();

        let backup = self
            .backup(path)
            .map_err(|source| CommitError::BackupFailure {
                path: target.clone(),
                source,
            })?;

        if let Err(write) = self.write(path, codec::serialize(entries)) {
            return match backup {
                Some(backup) => match self.restore(&backup, path) {
                    Ok(()) => Err(CommitError::WriteFailure {
                        path: target,
                        source: write,
                    }),
                    Err(restore) => Err(CommitError::RestoreFailure {
                        path: target,
                        backup: backup.display().to_string(),
                        write,
                        restore,
                    }),
                },
                None => Err(CommitError::WriteFailure {
                    path: target,
                    source: write,
                }),
            };
        }

        if let Some(backup) = backup {
            self.files.borrow_mut().remove(&backup);
        }
        Ok(())
    }

    fn backup(&self, path: &Path) -> Result<Option<PathBuf>, StoreError> {
        let Some(text) = self.contents(path) else {
            return Ok(None);
        };
        let backup = backup_path(path);
        if self.files.borrow().contains_key(&backup) {
            return Err(StoreError::backup_exists(&backup));
        }
        self.files.borrow_mut().insert(backup.clone(), text);
        Ok(Some(backup))
    }

    fn restore(&self, backup: &Path, path: &Path) -> Result<(), StoreError> {
        let mut files = self.files.borrow_mut();
        let text = files
            .remove(backup)
            .ok_or_else(|| StoreError::backup_missing(backup))?;
        files.insert(path.to_path_buf(), text);
        Ok(())
    }
}
