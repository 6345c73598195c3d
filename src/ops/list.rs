// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use tracing::{error, info};

use super::{ConfAction, ConfRequest, Outcome};
use crate::envfile::EnvStore;
use crate::error::OpError;

/// Lists the entries of the request's file. A missing file lists as empty.
///
/// # Errors
///
/// Returns [`OpError::Store`] if the file exists but cannot be read.
pub fn list<S: EnvStore + ?Sized>(store: &S, request: &ConfRequest) -> Result<Outcome, OpError> {
    if request.dry_run {
        return Ok(Outcome::dry_run(ConfAction::List));
    }

    let snapshot = store.read(&request.env_file).inspect_err(|e| {
        error!(service = %request.service, error = %e, "failed to list configuration");
    })?;

    info!(
        service = %request.service,
        entries = snapshot.entries.len(),
        "configuration listed"
    );
    Ok(Outcome {
        action: ConfAction::List,
        entries: snapshot.entries,
        dry_run: false,
    })
}
