// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Text format of environment files.
//!
//! ```text
//! # comment          skipped
//!                    skipped (blank)
//! garbage            skipped, MalformedLine warning
//! KEY = a=b          KEY -> "a=b"  (split on first '=', both sides trimmed)
//! ```
//!
//! No quoting or escaping. A later duplicate key silently replaces the
//! earlier one.

use std::fmt;

use super::EnvMap;

/// A line that was skipped because it has no `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number.
    pub line_number: usize,
    /// The trimmed line content.
    pub content: String,
}

impl fmt::Display for MalformedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: missing '=' in {:?}",
            self.line_number, self.content
        )
    }
}

/// Result of [`parse`]: the entries plus a warning per skipped line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    pub entries: EnvMap,
    pub warnings: Vec<MalformedLine>,
}

/// Parses environment-file text. Total over any input.
#[must_use]
pub fn parse(text: &str) -> Parsed {
    let mut parsed = Parsed::default();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) => {
                parsed
                    .entries
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
            None => parsed.warnings.push(MalformedLine {
                line_number: index + 1,
                content: line.to_string(),
            }),
        }
    }

    parsed
}

/// Serializes entries as sorted `key=value\n` lines.
///
/// The same map always yields the same bytes; an empty map yields `""`.
#[must_use]
pub fn serialize(entries: &EnvMap) -> String {
    let capacity = entries.iter().map(|(k, v)| k.len() + v.len() + 2).sum();
    let mut out = String::with_capacity(capacity);
    // BTreeMap<String, _> iterates in byte-lexicographic key order.
    for (key, value) in entries {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}
