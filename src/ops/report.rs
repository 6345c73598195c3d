// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Rendering of operation results.
//!
//! ```text
//! JSON  {"service", "key", "value", "success", "error", "config"}
//! text  success line(s) on stdout; failures are reported by the caller
//! ```

use serde::Serialize;

use super::{ConfAction, ConfRequest, Outcome};
use crate::envfile::EnvMap;
use crate::error::OpError;

/// Machine-readable result of one `conf` invocation.
///
/// `key` is `null` for list, `value` is `null` for list and delete. `config`
/// is only filled for a (non dry-run) list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfReport {
    pub service: String,
    pub key: Option<String>,
    pub value: Option<String>,
    pub success: bool,
    pub error: Option<String>,
    pub config: EnvMap,
}

impl ConfReport {
    #[must_use]
    pub fn new(
        action: ConfAction,
        request: &ConfRequest,
        result: &Result<Outcome, OpError>,
    ) -> Self {
        let (key, value) = match action {
            ConfAction::List => (None, None),
            ConfAction::Set => (request.key.clone(), request.value.clone()),
            ConfAction::Delete => (request.key.clone(), None),
        };

        let (success, error, config) = match result {
            Ok(outcome) if action == ConfAction::List => (true, None, outcome.entries.clone()),
            Ok(_) => (true, None, EnvMap::new()),
            Err(e) => (false, Some(e.to_string()), EnvMap::new()),
        };

        Self {
            service: request.service.clone(),
            key,
            value,
            success,
            error,
            config,
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Human-readable rendering of a successful outcome.
#[must_use]
pub fn render_text(request: &ConfRequest, outcome: &Outcome) -> String {
    if outcome.dry_run {
        return dry_run_preview(outcome.action, request);
    }

    let service = &request.service;
    let key = request.key.as_deref().unwrap_or_default();
    match outcome.action {
        ConfAction::List if outcome.entries.is_empty() => {
            format!("No configuration found for service '{service}'")
        }
        ConfAction::List => {
            let mut lines = vec![format!("Configuration for service '{service}':")];
            lines.extend(
                outcome
                    .entries
                    .iter()
                    .map(|(key, value)| format!("  {key}={value}")),
            );
            lines.join("\n")
        }
        ConfAction::Set => {
            let value = request.value.as_deref().unwrap_or_default();
            format!("Set {key}={value} for service '{service}'")
        }
        ConfAction::Delete => format!("Deleted {key} from service '{service}'"),
    }
}

fn dry_run_preview(action: ConfAction, request: &ConfRequest) -> String {
    let service = &request.service;
    let path = request.env_file.display();
    let key = request.key.as_deref().unwrap_or_default();
    let effect = match action {
        ConfAction::List => format!("Would list configuration for service '{service}' from {path}"),
        ConfAction::Set => {
            let value = request.value.as_deref().unwrap_or_default();
            format!("Would set {key}={value} for service '{service}' in {path}")
        }
        ConfAction::Delete => format!("Would delete {key} from service '{service}' in {path}"),
    };
    ["=== DRY RUN ===", effect.as_str(), "=== END DRY RUN ==="].join("\n")
}
