// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `conf` operations: list, set and delete entries of a service's
//! environment file.
//!
//! ```text
//! ConfRequest --validate--> dry_run? --yes--> Outcome (no I/O)
//!                               |
//!                               no
//!                               v
//!                    EnvStore::read -> mutate map -> EnvStore::commit
//! ```
//!
//! Validation always runs first, dry run or not.

pub mod delete;
pub mod list;
pub mod report;
pub mod set;


use std::fmt;
use std::path::PathBuf;

use bon::Builder;

use crate::envfile::{EnvMap, EnvStore};
use crate::error::OpError;

pub use delete::delete;
pub use list::list;
pub use report::ConfReport;
pub use set::set;

/// The three user-facing mutations (and the read).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfAction {
    List,
    Set,
    Delete,
}

impl ConfAction {
    /// Lowercase verb used in messages.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Set => "set",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ConfAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Input of an operation. The path is already resolved from the service.
#[derive(Debug, Clone, Builder)]
pub struct ConfRequest {
    #[builder(into)]
    pub service: String,
    #[builder(into)]
    pub env_file: PathBuf,
    #[builder(into)]
    pub key: Option<String>,
    #[builder(into)]
    pub value: Option<String>,
    #[builder(default)]
    pub dry_run: bool,
}

/// Successful result of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub action: ConfAction,
    /// Entries read (list) or written (set/delete). Empty for a dry run.
    pub entries: EnvMap,
    pub dry_run: bool,
}

impl Outcome {
    const fn dry_run(action: ConfAction) -> Self {
        Self {
            action,
            entries: EnvMap::new(),
            dry_run: true,
        }
    }
}

/// Runs `action` against `store`.
///
/// # Errors
///
/// Returns whatever the selected operation returns.
pub fn run<S: EnvStore + ?Sized>(
    store: &S,
    action: ConfAction,
    request: &ConfRequest,
) -> Result<Outcome, OpError> {
    match action {
        ConfAction::List => list(store, request),
        ConfAction::Set => set(store, request),
        ConfAction::Delete => delete(store, request),
    }
}

/// Returns the non-empty value of a required field.
fn require<'a>(field: Option<&'a str>, name: &str) -> Result<&'a str, OpError> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(OpError::Validation(format!("{name} is required"))),
    }
}

/// Returns a key that reads back unchanged once written as `key=value`.
fn require_key(field: Option<&str>) -> Result<&str, OpError> {
    let key = require_line(field, "key")?;
    if key.contains('=') {
        return Err(OpError::Validation("key must not contain '='".to_string()));
    }
    if key.starts_with('#') {
        return Err(OpError::Validation("key must not start with '#'".to_string()));
    }
    Ok(key)
}

/// Returns a value that reads back unchanged once written as `key=value`.
fn require_value(field: Option<&str>) -> Result<&str, OpError> {
    require_line(field, "value")
}

/// A required field that fits on one line without surrounding whitespace,
/// which the parser would otherwise split or trim away.
fn require_line<'a>(field: Option<&'a str>, name: &str) -> Result<&'a str, OpError> {
    let text = require(field, name)?;
    if text.contains(['\n', '\r']) {
        return Err(OpError::Validation(format!("{name} must not contain line breaks")));
    }
    if text.trim() != text {
        return Err(OpError::Validation(format!(
            "{name} must not have leading or trailing whitespace"
        )));
    }
    Ok(text)
}
