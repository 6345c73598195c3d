// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The [`EnvStore`] contract and its filesystem implementation.
//!
//! # Commit State Machine
//!
//! ```text
//! Idle -> BackingUp -> { NoBackupNeeded | BackedUp } -> Writing
//!      -> { Committed | WriteFailed }
//!      -> (WriteFailed) Restoring -> { Restored | RestoreFailed }
//!
//! Committed, Restored                 non-error terminal states
//! BackupFailure, RestoreFailed        escalate to the caller
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, debug_span, error, warn};

use super::atomic::{AtomicWriter, ContentWriter};
use super::backup::BackupManager;
use super::codec::{self, MalformedLine};
use super::EnvMap;
use crate::error::{CommitError, StoreError};

/// What [`EnvStore::read`] found at a path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub entries: EnvMap,
    /// `false` when the file does not exist; `entries` is then empty.
    pub existed: bool,
    pub warnings: Vec<MalformedLine>,
}

/// Read and all-or-nothing commit of environment files.
pub trait EnvStore {
    /// Reads and parses the file at `path`. A missing file is an empty
    /// snapshot, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read.
    fn read(&self, path: &Path) -> Result<Snapshot, StoreError>;

    /// Replaces the content of `path` with `entries`.
    ///
    /// # Errors
    ///
    /// See [`CommitError`]; on every variant except `RestoreFailure` the file
    /// holds its pre-commit content.
    fn commit(&self, path: &Path, entries: &EnvMap) -> Result<(), CommitError>;

    /// Takes a backup of `path`; `None` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the copy fails.
    fn backup(&self, path: &Path) -> Result<Option<PathBuf>, StoreError>;

    /// Puts `backup` back onto `path` and removes it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BackupMissing`] or [`StoreError::Io`].
    fn restore(&self, backup: &Path, path: &Path) -> Result<(), StoreError>;
}

/// [`EnvStore`] over real files.
#[derive(Debug, Clone, Default)]
pub struct FileEnvStore<W = AtomicWriter> {
    writer: W,
    backups: BackupManager,
}

impl FileEnvStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W: ContentWriter> FileEnvStore<W> {
    /// Creates a store that writes through `writer`.
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            backups: BackupManager,
        }
    }
}

impl<W: ContentWriter> EnvStore for FileEnvStore<W> {
    fn read(&self, path: &Path) -> Result<Snapshot, StoreError> {
        debug!(path = %path.display(), "reading environment file");

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "environment file does not exist");
                return Ok(Snapshot::default());
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let parsed = codec::parse(&text);
        for warning in &parsed.warnings {
            warn!(path = %path.display(), "skipping invalid {warning}");
        }
        debug!(
            path = %path.display(),
            entries = parsed.entries.len(),
            "environment file read"
        );

        Ok(Snapshot {
            entries: parsed.entries,
            existed: true,
            warnings: parsed.warnings,
        })
    }

    fn commit(&self, path: &Path, entries: &EnvMap) -> Result<(), CommitError> {
        let _span = debug_span!("commit", path = %path.display()).entered();
        let target = path.display().to_string();

        let backup = self
            .backup(path)
            .map_err(|source| CommitError::BackupFailure {
                path: target.clone(),
                source,
            })?;

        let content = codec::serialize(entries);
        debug!(entries = entries.len(), "writing environment file");

        if let Err(write) = self.writer.write(path, &content) {
            let Some(backup) = backup else {
                return Err(CommitError::WriteFailure {
                    path: target,
                    source: write,
                });
            };

            warn!(error = %write, "write failed, restoring backup");
            return match self.restore(&backup, path) {
                Ok(()) => Err(CommitError::WriteFailure {
                    path: target,
                    source: write,
                }),
                Err(restore) => {
                    error!(
                        backup = %backup.display(),
                        error = %restore,
                        "restore failed, backup left on disk"
                    );
                    Err(CommitError::RestoreFailure {
                        path: target,
                        backup: backup.display().to_string(),
                        write,
                        restore,
                    })
                }
            };
        }

        if let Some(backup) = backup
            && let Err(e) = self.backups.discard(&backup)
        {
            warn!(error = %e, "commit succeeded but backup could not be removed");
        }

        debug!("commit complete");
        Ok(())
    }

    fn backup(&self, path: &Path) -> Result<Option<PathBuf>, StoreError> {
        self.backups.backup(path)
    }

    fn restore(&self, backup: &Path, path: &Path) -> Result<(), StoreError> {
        self.backups.restore(backup, path)
    }
}
