// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file_optional()
//!   .add_toml_file(req)
//!   .add_toml_str()
//!   .with_env_prefix()
//!        |
//!        v
//!    build() --> defaults + sources --> Config
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Config, DEFAULT_API_ENV_FILE, DEFAULT_VIEW_ENV_FILE};
use crate::error::{ConfigError, Result};

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    files: Vec<PathBuf>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            files: Vec::new(),
        }
    }

    /// Adds a TOML configuration file to the loader.
    ///
    /// The file will be read when `build()` is called. If the file doesn't exist
    /// or contains invalid TOML, `build()` will return an error.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(true));
        self.files.push(p.to_path_buf());
        self
    }

    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(false));
        if p.exists() {
            self.files.push(p.to_path_buf());
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        use config::{File, FileFormat};
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self
    }

    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Configuration files that will be (or were) read.
    #[must_use]
    pub fn loaded_files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Builds the configuration from the defaults and all added sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required configuration files are missing.
    /// - Configuration files have invalid TOML syntax.
    /// - The merged configuration cannot be deserialized into the `Config` struct.
    pub fn build(self) -> Result<Config> {
        debug!(
            files = ?self.files,
            env_prefix = self.env_prefix.as_deref(),
            "loading configuration"
        );

        let builder = self
            .builder
            .set_default("services.api.env_file", DEFAULT_API_ENV_FILE)
            .and_then(|b| b.set_default("services.view.env_file", DEFAULT_VIEW_ENV_FILE))
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        let builder = match &self.env_prefix {
            Some(prefix) => builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
            None => builder,
        };

        let cfg = builder
            .build()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        let config: Config = cfg
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
