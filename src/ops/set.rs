// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use tracing::{error, info};

use super::{ConfAction, ConfRequest, Outcome, require_key, require_value};
use crate::envfile::EnvStore;
use crate::error::OpError;

/// Sets `key` to `value`, creating the file if needed.
///
/// Setting a key to its current value still runs a full commit.
///
/// # Errors
///
/// Returns [`OpError::Validation`] for a missing or malformed key or value,
/// otherwise any read or commit failure.
pub fn set<S: EnvStore + ?Sized>(store: &S, request: &ConfRequest) -> Result<Outcome, OpError> {
    let key = require_key(request.key.as_deref())?;
    let value = require_value(request.value.as_deref())?;

    if request.dry_run {
        return Ok(Outcome::dry_run(ConfAction::Set));
    }

    let result = store.read(&request.env_file).map_err(OpError::from).and_then(|snapshot| {
        let mut entries = snapshot.entries;
        entries.insert(key.to_string(), value.to_string());
        store.commit(&request.env_file, &entries)?;
        Ok(entries)
    });

    match result {
        Ok(entries) => {
            info!(service = %request.service, key, value, "configuration set");
            Ok(Outcome {
                action: ConfAction::Set,
                entries,
                dry_run: false,
            })
        }
        Err(e) => {
            error!(service = %request.service, kind = e.kind(), error = %e, "failed to set configuration");
            Err(e)
        }
    }
}
