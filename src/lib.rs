// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                                      |
//!                     +----------------+
//!                     v                v
//!                  config             ops
//!             TOML, services    list / set / delete
//!                                      |
//!                                      v
//!              ,----------------------------------------,
//!              |                envfile                  |
//!              |  codec, atomic writer, backup, store    |
//!              '-----------------------------------------'
//!
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod envfile;
pub mod error;
pub mod logging;
pub mod ops;
