// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Crash-safe `KEY=VALUE` environment-file store.
//!
//! ```text
//! EnvStore::read(path)                 EnvStore::commit(path, map)
//!   |                                    |
//!   v                                    v
//! fs::read_to_string               BackupManager::backup   --err--> BackupFailure
//!   |  NotFound => empty map             |
//!   v                                    v
//! codec::parse                     ContentWriter::write(codec::serialize(map))
//!   entries + warnings                   |ok                 |err
//!                                        v                   v
//!                            BackupManager::discard   BackupManager::restore
//!                                        |               |ok          |err
//!                                        v               v            v
//!                                    Committed      WriteFailure  RestoreFailure
//! ```
//!
//! The file on disk always holds either the pre-commit or the post-commit
//! content in full. There is no cross-process locking: two concurrent
//! read-modify-write cycles on one path race and the last commit wins.

pub mod atomic;
pub mod backup;
pub mod codec;
pub mod memory;
pub mod store;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

/// Parsed content of an environment file, ordered by key.
pub type EnvMap = BTreeMap<String, String>;

pub use atomic::{AtomicWriter, ContentWriter};
pub use backup::{BackupManager, backup_path};
pub use codec::{MalformedLine, Parsed, parse, serialize};
pub use memory::MemoryEnvStore;
pub use store::{EnvStore, FileEnvStore, Snapshot};
