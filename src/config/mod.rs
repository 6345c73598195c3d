// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults            services.api / services.view
//! 2. nixopus.toml        (cwd, optional)
//! 3. --config FILE       (repeatable, required)
//! 4. NIXOPUS_* env vars
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! NIXOPUS_SERVICES__API__ENV_FILE=/srv/api/.env  → services.api.env_file
//! ```
//!
//! The resulting [`Config`] is built once in `main` and passed by reference.

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::ServiceConfig;

/// Default environment file of the `api` service.
pub const DEFAULT_API_ENV_FILE: &str = "/etc/nixopus/source/api/.env";

/// Default environment file of the `view` service.
pub const DEFAULT_VIEW_ENV_FILE: &str = "/etc/nixopus/source/view/.env";

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Services whose environment files `conf` manages, by name.
    pub services: BTreeMap<String, ServiceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let services = [
            ("api", DEFAULT_API_ENV_FILE),
            ("view", DEFAULT_VIEW_ENV_FILE),
        ]
        .into_iter()
        .map(|(name, env_file)| (name.to_string(), ServiceConfig::new(env_file)))
        .collect();
        Self { services }
    }
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nixopus_cli::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("nixopus.toml")
    ///     .with_env_prefix("NIXOPUS")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a TOML string on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Resolves the environment file of `service`.
    ///
    /// An explicit, non-blank `env_file` wins over the configured default.
    /// The returned path is absolute.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownService`] if no env file is configured
    /// for `service`, or [`ConfigError::InvalidValue`] if the path cannot be
    /// made absolute.
    pub fn resolve_env_file(
        &self,
        service: &str,
        env_file: Option<&Path>,
    ) -> std::result::Result<PathBuf, ConfigError> {
        let path = match env_file.and_then(non_blank) {
            Some(path) => path,
            None => self
                .services
                .get(service)
                .map(|s| s.env_file.clone())
                .ok_or_else(|| ConfigError::UnknownService {
                    service: service.to_string(),
                    known: self.service_names().join(", "),
                })?,
        };

        std::path::absolute(&path).map_err(|e| ConfigError::InvalidValue {
            section: format!("services.{service}"),
            key: "env_file".to_string(),
            message: format!("cannot resolve {}: {e}", path.display()),
        })
    }

    /// Names of all configured services, sorted.
    #[must_use]
    pub fn service_names(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    /// Format the service table for display.
    #[must_use]
    pub fn format_services(&self) -> Vec<String> {
        let width = self.services.keys().map(String::len).max().unwrap_or(0);
        self.services
            .iter()
            .map(|(name, service)| format!("{name:<width$} = {}", service.env_file.display()))
            .collect()
    }
}

/// Trims an override path; `None` if nothing is left.
fn non_blank(path: &Path) -> Option<PathBuf> {
    match path.to_str() {
        Some(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
        }
        None => Some(path.to_path_buf()),
    }
}
