// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `conf` command arguments.
//!
//! ```text
//! conf list     [-s SERVICE] [-e FILE] [-o text|json] [-d]
//! conf set      [-s SERVICE] -k KEY --value VALUE [-e FILE] [-o ...] [-d]
//! conf delete   [-s SERVICE] -k KEY [-e FILE] [-o ...] [-d]
//! conf services [-o ...]
//! ```
//!
//! `--key` and `--value` are optional here so that missing input is reported
//! by the operation in the requested output format.

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Arguments for the `conf` command.
#[derive(Debug, Clone, Args)]
pub struct ConfArgs {
    #[command(subcommand)]
    pub subcommand: ConfSubcommand,
}

/// `conf` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfSubcommand {
    /// Lists all configuration of a service.
    List(TargetArgs),

    /// Sets a configuration value.
    Set(SetArgs),

    /// Deletes a configuration key.
    Delete(DeleteArgs),

    /// Lists known services and their default environment files.
    Services(ServicesArgs),
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Which file to operate on and how to report.
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// Name of the service, e.g. api, view.
    #[arg(short = 's', long, default_value = "api")]
    pub service: String,

    /// Path to the environment file, overrides the service's default.
    #[arg(short = 'e', long = "env-file", value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Output format.
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Shows what would change without touching any file.
    #[arg(short = 'd', long = "dry-run")]
    pub dry_run: bool,
}

/// Arguments for `conf set`.
#[derive(Debug, Clone, Args)]
pub struct SetArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Key to set.
    #[arg(short = 'k', long)]
    pub key: Option<String>,

    /// Value to set.
    #[arg(long, allow_hyphen_values = true)]
    pub value: Option<String>,
}

/// Arguments for `conf delete`.
#[derive(Debug, Clone, Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Key to delete.
    #[arg(short = 'k', long)]
    pub key: Option<String>,
}

/// Arguments for `conf services`.
#[derive(Debug, Clone, Args)]
pub struct ServicesArgs {
    /// Output format.
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}
