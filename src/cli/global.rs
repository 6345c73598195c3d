// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! ```text
//! --config FILE     ← Additional config files (can repeat)
//! --log-level N     ← Console verbosity (0-6), wins over --verbose
//! --verbose         ← Console verbosity 4 (debug)
//! --log-file FILE   ← Also log to FILE
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::logging::LogLevel;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true, action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", global = true, value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// Verbose output (same as --log-level 4).
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE", env = "NIXOPUS_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,
}

impl GlobalOptions {
    /// Console log level after applying `--log-level` and `--verbose`.
    #[must_use]
    pub fn console_level(&self) -> LogLevel {
        self.log_level
            .and_then(LogLevel::from_u8)
            .unwrap_or(if self.verbose {
                LogLevel::DEBUG
            } else {
                LogLevel::WARN
            })
    }
}
