// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! nixopus [global options] <command>
//! version
//! conf {list|set|delete|services}
//! ```

pub mod conf;
pub mod global;

#[cfg(test)]
mod tests;

use crate::cli::conf::ConfArgs;
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// Nixopus CLI
///
/// Installs, configures and inspects a self-hosted Nixopus deployment.
#[derive(Debug, Parser)]
#[command(
    name = "nixopus",
    author,
    version,
    about = "Nixopus operations CLI",
    long_about = "Installs, configures and inspects a self-hosted Nixopus deployment.\n\n\
                  Use `nixopus conf` to read and change the environment files of\n\
                  the platform's services. See `nixopus <command> --help` for more\n\
                  information about a command.",
    after_help = "CONFIG FILES:\n\n\
                  nixopus reads `nixopus.toml` from the current directory if it\n\
                  exists. Additional files can be given with --config; later files\n\
                  override earlier ones. NIXOPUS_* environment variables override\n\
                  all files, e.g. NIXOPUS_SERVICES__API__ENV_FILE=/srv/api/.env."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Manages service configuration (environment files).
    Conf(ConfArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
