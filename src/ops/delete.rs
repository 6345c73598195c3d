// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use tracing::{error, info};

use super::{ConfAction, ConfRequest, Outcome, require_key};
use crate::envfile::EnvStore;
use crate::error::OpError;

/// Removes `key` from the file.
///
/// # Errors
///
/// Returns [`OpError::Validation`] for a missing or malformed key and
/// [`OpError::KeyNotFound`] if the key is absent (the file is then not
/// written), otherwise any read or commit failure.
pub fn delete<S: EnvStore + ?Sized>(store: &S, request: &ConfRequest) -> Result<Outcome, OpError> {
    let key = require_key(request.key.as_deref())?;

    if request.dry_run {
        return Ok(Outcome::dry_run(ConfAction::Delete));
    }

    let result = store.read(&request.env_file).map_err(OpError::from).and_then(|snapshot| {
        let mut entries = snapshot.entries;
        if entries.remove(key).is_none() {
            return Err(OpError::KeyNotFound {
                key: key.to_string(),
                path: request.env_file.display().to_string(),
            });
        }
        store.commit(&request.env_file, &entries)?;
        Ok(entries)
    });

    match result {
        Ok(entries) => {
            info!(service = %request.service, key, "configuration deleted");
            Ok(Outcome {
                action: ConfAction::Delete,
                entries,
                dry_run: false,
            })
        }
        Err(e) => {
            error!(service = %request.service, kind = e.kind(), error = %e, "failed to delete configuration");
            Err(e)
        }
    }
}
