// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types.
//!
//! ```toml
//! [services.api]
//! env_file = "/etc/nixopus/source/api/.env"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Per-service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Environment file edited by `conf` when `--env-file` is not given.
    pub env_file: PathBuf,
}

impl ServiceConfig {
    pub fn new(env_file: impl Into<PathBuf>) -> Self {
        Self {
            env_file: env_file.into(),
        }
    }
}
