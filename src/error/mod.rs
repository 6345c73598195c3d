// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!   anyhow::Result        command handlers, config loading, main
//!
//!   StoreError            Io, BackupMissing, BackupExists
//!        |
//!        v
//!   CommitError           BackupFailure | WriteFailure | RestoreFailure
//!        |
//!        v
//!   OpError               Validation | KeyNotFound | Store | Commit
//!
//!   ConfigError           UnknownService, InvalidValue, ParseError
//! ```
//!
//! Missing files and malformed lines are not errors: the store reports them
//! as values (`Snapshot::existed`, `Snapshot::warnings`).

use std::path::Path;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

// --- Store Errors ---

/// Low-level filesystem failure inside the environment-file store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Permission error, disk exhaustion or any other OS-level failure.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The backup a restore was asked to use is not on disk.
    #[error("backup file not found: {path}")]
    BackupMissing { path: String },

    /// A backup from an earlier commit is still on disk and must be
    /// inspected and removed by hand before the file is written again.
    #[error("backup file already exists: {path}")]
    BackupExists { path: String },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn backup_missing(path: &Path) -> Self {
        Self::BackupMissing {
            path: path.display().to_string(),
        }
    }

    pub(crate) fn backup_exists(path: &Path) -> Self {
        Self::BackupExists {
            path: path.display().to_string(),
        }
    }
}

// --- Commit Errors ---

/// Failure of a single backup → write → restore/discard cycle.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The pre-write backup failed; the target was not touched.
    #[error("failed to back up '{path}'")]
    BackupFailure {
        path: String,
        #[source]
        source: StoreError,
    },

    /// The write failed; the target holds its pre-commit content.
    #[error("failed to write '{path}'")]
    WriteFailure {
        path: String,
        #[source]
        source: StoreError,
    },

    /// The write failed and so did the restore. The backup is left on disk.
    #[error(
        "failed to write '{path}' ({write}); restoring from '{backup}' also failed, \
         manual intervention required"
    )]
    RestoreFailure {
        path: String,
        backup: String,
        write: StoreError,
        #[source]
        restore: StoreError,
    },
}

impl CommitError {
    /// True when the on-disk state is unknown and an operator has to step in.
    #[must_use]
    pub const fn requires_intervention(&self) -> bool {
        matches!(self, Self::RestoreFailure { .. })
    }

    /// Stable machine-readable name of the failure.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BackupFailure { .. } => "backup_failure",
            Self::WriteFailure { .. } => "write_failure",
            Self::RestoreFailure { .. } => "restore_failure",
        }
    }
}

// --- Operation Errors ---

/// Failure of a user-facing `conf` operation.
#[derive(Debug, Error)]
pub enum OpError {
    /// Missing or empty input, rejected before any I/O.
    #[error("{0}")]
    Validation(String),

    /// `delete` was asked to remove a key the file does not contain.
    #[error("configuration key '{key}' not found in {path}")]
    KeyNotFound { key: String, path: String },

    /// Reading the current file failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Committing the new content failed.
    #[error(transparent)]
    Commit(#[from] CommitError),
}

impl OpError {
    /// Stable machine-readable name of the failure.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::KeyNotFound { .. } => "key_not_found",
            Self::Store(_) => "io",
            Self::Commit(e) => e.kind(),
        }
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No environment file is configured for the requested service.
    #[error("unknown service '{service}' (known services: {known})")]
    UnknownService { service: String, known: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Failed to parse configuration sources.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),
}
