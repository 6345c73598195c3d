// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Temp-file-and-rename writes.
//!
//! ```text
//! create_dir_all(parent)
//!   -> NamedTempFile::new_in(parent)     same filesystem as target
//!   -> write_all + flush
//!   -> sync_all                          best effort
//!   -> persist(path)                     atomic rename over target
//! ```
//!
//! Any failure drops the `NamedTempFile`, which deletes it; the target is
//! never touched before the rename.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::error::StoreError;

/// Replaces the content of a file. Seam for failure injection in tests.
pub trait ContentWriter {
    /// Writes `content` to `path` so readers see either the old or the new
    /// content, never a mix.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if any step fails; `path` is then untouched.
    fn write(&self, path: &Path, content: &str) -> Result<(), StoreError>;
}

/// Production [`ContentWriter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicWriter;

impl ContentWriter for AtomicWriter {
    fn write(&self, path: &Path, content: &str) -> Result<(), StoreError> {
        let dir = parent_dir(path);
        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        trace!(temp = %tmp.path().display(), "created temp file");

        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.flush())
            .map_err(|e| StoreError::io(tmp.path(), e))?;

        if let Err(e) = tmp.as_file().sync_all() {
            debug!(error = %e, "fsync not supported, continuing");
        }

        // Keep the mode of the file being replaced; temp files are 0600.
        if let Ok(meta) = fs::metadata(path)
            && let Err(e) = fs::set_permissions(tmp.path(), meta.permissions())
        {
            debug!(error = %e, "could not copy permissions to temp file");
        }

        tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
        sync_dir(dir);

        debug!(path = %path.display(), bytes = content.len(), "atomic write complete");
        Ok(())
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Ok(handle) = fs::File::open(dir) {
        let _ = handle.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
