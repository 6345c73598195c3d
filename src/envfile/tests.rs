// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{
    AtomicWriter, BackupManager, ContentWriter, EnvMap, EnvStore, FileEnvStore, MalformedLine,
    MemoryEnvStore, backup_path, parse, serialize,
};
use crate::error::{CommitError, StoreError};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn map(pairs: &[(&str, &str)]) -> EnvMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a WARN-level subscriber and returns its output.
fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    (result, logs)
}

/// Replaces `path` with a non-empty directory so `remove_file` on it fails.
fn make_unremovable(path: &Path) {
    std::fs::remove_file(path).unwrap();
    std::fs::create_dir(path).unwrap();
    std::fs::write(path.join("pinned"), "x").unwrap();
}

/// Writer that always fails as if the disk were full.
struct DiskFull;

impl ContentWriter for DiskFull {
    fn write(&self, path: &Path, _content: &str) -> Result<(), StoreError> {
        Err(StoreError::io(
            path,
            io::Error::from(io::ErrorKind::StorageFull),
        ))
    }
}

/// Writer that loses the backup before failing, so the restore cannot work.
struct LosesBackup;

impl ContentWriter for LosesBackup {
    fn write(&self, path: &Path, _content: &str) -> Result<(), StoreError> {
        std::fs::remove_file(backup_path(path)).unwrap();
        Err(StoreError::io(
            path,
            io::Error::from(io::ErrorKind::PermissionDenied),
        ))
    }
}

/// Writer that succeeds but leaves the backup impossible to remove.
struct PinsBackup;

impl ContentWriter for PinsBackup {
    fn write(&self, path: &Path, content: &str) -> Result<(), StoreError> {
        AtomicWriter.write(path, content)?;
        make_unremovable(&backup_path(path));
        Ok(())
    }
}

// =============================================================================
// Codec
// =============================================================================

#[test]
fn test_parse_skips_comments_and_blank_lines() {
    let parsed = parse("# header\n\nA=1\n   # indented comment\nB = two words \n");
    assert_eq!(parsed.entries, map(&[("A", "1"), ("B", "two words")]));
    assert!(parsed.warnings.is_empty());
}

#[test]
fn test_parse_splits_on_first_equals() {
    let parsed = parse("URL=postgres://u:p@h/db?sslmode=disable\nEMPTY=\n=orphan\n");
    assert_eq!(
        parsed.entries,
        map(&[
            ("URL", "postgres://u:p@h/db?sslmode=disable"),
            ("EMPTY", ""),
            ("", "orphan"),
        ])
    );
}

#[test]
fn test_parse_warns_on_line_without_equals() {
    let parsed = parse("garbage\nX=1\n");
    assert_eq!(parsed.entries, map(&[("X", "1")]));
    assert_eq!(
        parsed.warnings,
        vec![MalformedLine {
            line_number: 1,
            content: "garbage".to_string(),
        }]
    );
    insta::assert_snapshot!(parsed.warnings[0].to_string(), @r#"line 1: missing '=' in "garbage""#);
}

#[test]
fn test_parse_duplicate_key_last_wins_silently() {
    let parsed = parse("PORT=8080\nHOST=localhost\nPORT=9090\n");
    assert_eq!(parsed.entries["PORT"], "9090");
    assert_eq!(parsed.entries.len(), 2);
    assert!(parsed.warnings.is_empty());
}

#[test]
fn test_parse_handles_crlf() {
    let parsed = parse("A=1\r\nB=2\r\n");
    assert_eq!(parsed.entries, map(&[("A", "1"), ("B", "2")]));
}

#[test]
fn test_serialize_sorted_with_trailing_newline() {
    let entries = map(&[("b", "2"), ("B", "x"), ("a", "1")]);
    assert_eq!(serialize(&entries), "B=x\na=1\nb=2\n");
    assert_eq!(serialize(&EnvMap::new()), "");
}

#[test]
fn test_serialize_parse_stable() {
    let text = "# comment\nZ = last\nbroken line\nA=first=still first\n\nM=  \n";
    let once = serialize(&parse(text).entries);
    let twice = serialize(&parse(&once).entries);
    assert_eq!(once, twice);
    assert_eq!(parse(&once).entries, parse(text).entries);
}

// =============================================================================
// AtomicWriter
// =============================================================================

#[test]
fn test_atomic_write_creates_parent_directories() {
    let temp = temp_dir();
    let path = temp.path().join("nested/deeper/.env");

    AtomicWriter.write(&path, "A=1\n").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "A=1\n");
}

#[test]
fn test_atomic_write_replaces_and_leaves_no_temp_files() {
    let temp = temp_dir();
    let path = temp.path().join(".env");
    std::fs::write(&path, "OLD=1\n").unwrap();

    AtomicWriter.write(&path, "NEW=2\n").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "NEW=2\n");
    assert_eq!(dir_entries(temp.path()), vec![".env".to_string()]);
}

#[test]
fn test_atomic_write_failure_leaves_target_untouched() {
    let temp = temp_dir();
    // A directory cannot be replaced by a file through rename.
    let path = temp.path().join("occupied");
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("inside"), "keep").unwrap();

    let err = AtomicWriter.write(&path, "A=1\n").unwrap_err();

    assert!(matches!(err, StoreError::Io { .. }));
    assert!(path.is_dir());
    assert_eq!(dir_entries(temp.path()), vec!["occupied".to_string()]);
}

#[cfg(unix)]
#[test]
fn test_atomic_write_keeps_existing_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp = temp_dir();
    let path = temp.path().join(".env");
    std::fs::write(&path, "A=1\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

    AtomicWriter.write(&path, "A=2\n").unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o640);
}

// =============================================================================
// BackupManager
// =============================================================================

#[test]
fn test_backup_missing_file_is_not_needed() {
    let temp = temp_dir();
    let result = BackupManager.backup(&temp.path().join(".env")).unwrap();
    assert!(result.is_none());
    assert!(dir_entries(temp.path()).is_empty());
}

#[test]
fn test_backup_and_restore_round_trip() {
    let temp = temp_dir();
    let path = temp.path().join(".env");
    std::fs::write(&path, "A=1\n# kept verbatim\n").unwrap();

    let backup = BackupManager.backup(&path).unwrap().unwrap();
    assert_eq!(backup, temp.path().join(".env.backup"));
    assert_eq!(
        std::fs::read_to_string(&backup).unwrap(),
        "A=1\n# kept verbatim\n"
    );

    std::fs::write(&path, "clobbered").unwrap();
    BackupManager.restore(&backup, &path).unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "A=1\n# kept verbatim\n"
    );
    assert!(!backup.exists());
}

#[test]
fn test_restore_without_backup_fails() {
    let temp = temp_dir();
    let path = temp.path().join(".env");
    let err = BackupManager
        .restore(&backup_path(&path), &path)
        .unwrap_err();
    assert!(matches!(err, StoreError::BackupMissing { .. }));
}

#[test]
fn test_backup_refuses_to_overwrite_existing_backup() {
    let temp = temp_dir();
    let path = temp.path().join(".env");
    std::fs::write(&path, "K=new\n").unwrap();
    std::fs::write(backup_path(&path), "K=old\n").unwrap();

    let err = BackupManager.backup(&path).unwrap_err();

    assert!(matches!(err, StoreError::BackupExists { .. }));
    assert_eq!(
        std::fs::read_to_string(backup_path(&path)).unwrap(),
        "K=old\n"
    );
}

#[cfg(unix)]
#[test]
fn test_restore_succeeds_when_backup_cannot_be_removed() {
    use std::os::unix::fs::PermissionsExt;

    let temp = temp_dir();
    let path = temp.path().join(".env");
    let locked = temp.path().join("locked");
    std::fs::create_dir(&locked).unwrap();
    let backup = locked.join(".env.backup");
    std::fs::write(&backup, "K=old\n").unwrap();
    std::fs::write(&path, "clobbered").unwrap();
    // A read-only directory forbids unlinking its entries (unless running as root).
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

    let (result, logs) = capture_warnings(|| BackupManager.restore(&backup, &path));

    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
    result.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "K=old\n");
    if backup.exists() {
        assert!(logs.contains("could not remove"), "logs: {logs}");
    }
}

#[test]
fn test_discard_tolerates_missing_backup() {
    let temp = temp_dir();
    let backup = temp.path().join(".env.backup");
    std::fs::write(&backup, "A=1\n").unwrap();

    BackupManager.discard(&backup).unwrap();
    BackupManager.discard(&backup).unwrap();

    assert!(!backup.exists());
}

// =============================================================================
// FileEnvStore
// =============================================================================

#[test]
fn test_read_missing_file_is_empty() {
    let temp = temp_dir();
    let snapshot = FileEnvStore::new().read(&temp.path().join(".env")).unwrap();
    assert!(!snapshot.existed);
    assert!(snapshot.entries.is_empty());
}

#[test]
fn test_read_malformed_line_logs_one_warning() {
    let temp = temp_dir();
    let path = temp.path().join(".env");
    std::fs::write(&path, "garbage\nX=1\n").unwrap();

    let (snapshot, logs) = capture_warnings(|| FileEnvStore::new().read(&path).unwrap());

    assert_eq!(snapshot.entries, map(&[("X", "1")]));
    assert_eq!(snapshot.warnings.len(), 1);
    assert_eq!(logs.matches("WARN").count(), 1, "logs: {logs}");
    assert!(logs.contains("garbage"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "garbage\nX=1\n");
}

#[cfg(unix)]
#[test]
fn test_read_non_utf8_is_io_failure() {
    let temp = temp_dir();
    let path = temp.path().join(".env");
    std::fs::write(&path, [b'A', b'=', 0xff, b'\n']).unwrap();

    let err = FileEnvStore::new().read(&path).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}

#[test]
fn test_commit_creates_missing_file() {
    let temp = temp_dir();
    let path = temp.path().join("api/.env");

    FileEnvStore::new()
        .commit(&path, &map(&[("FOO", "bar")]))
        .unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "FOO=bar\n");
    assert!(!backup_path(&path).exists());
}

#[test]
fn test_commit_removes_backup_on_success() {
    let temp = temp_dir();
    let path = temp.path().join(".env");
    std::fs::write(&path, "A=1\nB=2\n").unwrap();

    FileEnvStore::new().commit(&path, &map(&[("A", "1")])).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "A=1\n");
    assert_eq!(dir_entries(temp.path()), vec![".env".to_string()]);
}

#[test]
fn test_commit_succeeds_when_backup_cannot_be_removed() {
    let temp = temp_dir();
    let path = temp.path().join(".env");
    std::fs::write(&path, "K=old\n").unwrap();

    let (result, logs) = capture_warnings(|| {
        FileEnvStore::with_writer(PinsBackup).commit(&path, &map(&[("K", "new")]))
    });

    result.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "K=new\n");
    assert!(logs.contains("backup could not be removed"), "logs: {logs}");
}

#[test]
fn test_commit_refuses_when_earlier_backup_is_left() {
    let temp = temp_dir();
    let path = temp.path().join(".env");
    std::fs::write(&path, "K=current\n").unwrap();
    std::fs::write(backup_path(&path), "K=left-by-failed-restore\n").unwrap();

    let err = FileEnvStore::new()
        .commit(&path, &map(&[("K", "new")]))
        .unwrap_err();

    match err {
        CommitError::BackupFailure { source, .. } => {
            assert!(matches!(source, StoreError::BackupExists { .. }));
        }
        other => panic!("expected BackupFailure, got {other:?}"),
    }
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "K=current\n");
    assert_eq!(
        std::fs::read_to_string(backup_path(&path)).unwrap(),
        "K=left-by-failed-restore\n"
    );
}

#[test]
fn test_commit_write_failure_restores_original_bytes() {
    let temp = temp_dir();
    let path = temp.path().join(".env");
    let original = "# untouched comment\nK=old\n";
    std::fs::write(&path, original).unwrap();

    let store = FileEnvStore::with_writer(DiskFull);
    let err = store.commit(&path, &map(&[("K", "V")])).unwrap_err();

    assert!(matches!(err, CommitError::WriteFailure { .. }));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    assert!(!backup_path(&path).exists());
}

#[test]
fn test_commit_write_failure_without_backup() {
    let temp = temp_dir();
    let path = temp.path().join(".env");

    let err = FileEnvStore::with_writer(DiskFull)
        .commit(&path, &map(&[("K", "V")]))
        .unwrap_err();

    assert!(matches!(err, CommitError::WriteFailure { .. }));
    assert!(!path.exists());
    assert!(dir_entries(temp.path()).is_empty());
}

#[test]
fn test_commit_restore_failure_is_compounded() {
    let temp = temp_dir();
    let path = temp.path().join(".env");
    std::fs::write(&path, "K=old\n").unwrap();

    let err = FileEnvStore::with_writer(LosesBackup)
        .commit(&path, &map(&[("K", "V")]))
        .unwrap_err();

    assert!(err.requires_intervention());
    match err {
        CommitError::RestoreFailure {
            write, restore, ..
        } => {
            assert!(matches!(write, StoreError::Io { .. }));
            assert!(matches!(restore, StoreError::BackupMissing { .. }));
        }
        other => panic!("expected RestoreFailure, got {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn test_commit_backup_failure_leaves_target_untouched() {
    use std::os::unix::fs::PermissionsExt;

    let temp = temp_dir();
    let path = temp.path().join(".env");
    std::fs::write(&path, "K=old\n").unwrap();
    // Unreadable source makes the backup copy fail (unless running as root).
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();
    if std::fs::read(&path).is_ok() {
        return;
    }

    let err = FileEnvStore::new()
        .commit(&path, &map(&[("K", "new")]))
        .unwrap_err();

    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
    assert!(matches!(err, CommitError::BackupFailure { .. }));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "K=old\n");
}

// =============================================================================
// MemoryEnvStore
// =============================================================================

#[test]
fn test_memory_store_commit_and_restore() {
    let store = MemoryEnvStore::new();
    let path = Path::new("/srv/api/.env");
    store.insert(path, "K=old\n");

    store.fail_writes(true);
    let err = store.commit(path, &map(&[("K", "V")])).unwrap_err();
    assert!(matches!(err, CommitError::WriteFailure { .. }));
    assert_eq!(store.contents(path).as_deref(), Some("K=old\n"));
    assert!(store.contents(&backup_path(path)).is_none());

    store.fail_writes(false);
    store.commit(path, &map(&[("K", "V")])).unwrap();
    assert_eq!(store.contents(path).as_deref(), Some("K=V\n"));
    assert_eq!(store.commit_count(), 2);
}

#[test]
fn test_memory_store_keeps_existing_backup() {
    let store = MemoryEnvStore::new();
    let path = Path::new("/srv/api/.env");
    store.insert(path, "K=old\n");
    store.insert(backup_path(path), "K=older\n");

    let err = store.commit(path, &map(&[("K", "V")])).unwrap_err();

    assert!(matches!(err, CommitError::BackupFailure { .. }));
    assert_eq!(store.contents(path).as_deref(), Some("K=old\n"));
    assert_eq!(
        store.contents(&backup_path(path)).as_deref(),
        Some("K=older\n")
    );
}
