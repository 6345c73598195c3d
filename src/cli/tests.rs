// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::conf::{ConfSubcommand, OutputFormat};
use crate::cli::{Cli, Command};
use crate::logging::LogLevel;
use clap::Parser;
use std::path::PathBuf;

fn conf(args: &[&str]) -> ConfSubcommand {
    let cli = Cli::try_parse_from(args).unwrap();
    match cli.command {
        Some(Command::Conf(conf)) => conf.subcommand,
        other => panic!("expected conf command, got {other:?}"),
    }
}

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["nixopus", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_conf_list_defaults() {
    let ConfSubcommand::List(target) = conf(&["nixopus", "conf", "list"]) else {
        panic!("expected list");
    };
    assert_eq!(target.service, "api");
    assert_eq!(target.env_file, None);
    assert_eq!(target.output, OutputFormat::Text);
    assert!(!target.dry_run);
}

#[test]
fn test_parse_conf_set_short_flags() {
    let ConfSubcommand::Set(args) = conf(&[
        "nixopus", "conf", "set", "-s", "view", "-k", "PORT", "--value", "7443", "-e",
        "/tmp/view.env", "-o", "json", "-d",
    ]) else {
        panic!("expected set");
    };
    assert_eq!(args.target.service, "view");
    assert_eq!(args.key.as_deref(), Some("PORT"));
    assert_eq!(args.value.as_deref(), Some("7443"));
    assert_eq!(args.target.env_file, Some(PathBuf::from("/tmp/view.env")));
    assert_eq!(args.target.output, OutputFormat::Json);
    assert!(args.target.dry_run);
}

#[test]
fn test_parse_conf_set_hyphen_value() {
    let ConfSubcommand::Set(args) = conf(&[
        "nixopus", "conf", "set", "--key", "FLAGS", "--value", "-Xmx512m",
    ]) else {
        panic!("expected set");
    };
    assert_eq!(args.value.as_deref(), Some("-Xmx512m"));
}

#[test]
fn test_parse_conf_set_without_key_is_accepted() {
    let ConfSubcommand::Set(args) = conf(&["nixopus", "conf", "set", "--value", "v"]) else {
        panic!("expected set");
    };
    assert_eq!(args.key, None);
}

#[test]
fn test_parse_conf_delete() {
    let ConfSubcommand::Delete(args) = conf(&["nixopus", "conf", "delete", "--key", "OLD"]) else {
        panic!("expected delete");
    };
    assert_eq!(args.key.as_deref(), Some("OLD"));
    assert_eq!(args.target.service, "api");
}

#[test]
fn test_parse_invalid_output_rejected() {
    let result = Cli::try_parse_from(["nixopus", "conf", "list", "-o", "yaml"]);
    assert!(result.is_err());
}

#[test]
fn test_global_options_after_subcommand() {
    let cli = Cli::try_parse_from([
        "nixopus", "conf", "list", "-v", "--config", "a.toml", "-c", "b.toml",
    ])
    .unwrap();
    assert!(cli.global.verbose);
    assert_eq!(
        cli.global.configs,
        vec![PathBuf::from("a.toml"), PathBuf::from("b.toml")]
    );
    assert_eq!(cli.global.console_level(), LogLevel::DEBUG);
}

#[test]
fn test_log_level_wins_over_verbose() {
    let cli = Cli::try_parse_from(["nixopus", "-v", "-l", "1", "version"]).unwrap();
    assert_eq!(cli.global.console_level(), LogLevel::ERROR);

    let cli = Cli::try_parse_from(["nixopus", "version"]).unwrap();
    assert_eq!(cli.global.console_level(), LogLevel::WARN);
}

#[test]
fn test_log_level_out_of_range_rejected() {
    assert!(Cli::try_parse_from(["nixopus", "-l", "7", "version"]).is_err());
}

#[test]
fn test_cli_definition_is_valid() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
