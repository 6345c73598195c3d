// nixopus-cli: Nixopus operations CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `conf` command implementation.
//!
//! Output goes to stdout. A failed operation still prints its JSON report
//! when `--output json` is used, then returns the error so `main` reports it
//! on stderr and exits with 1.

use anyhow::Context;
use tracing::error;

use crate::cli::conf::{ConfArgs, ConfSubcommand, OutputFormat, TargetArgs};
use crate::config::Config;
use crate::envfile::{EnvStore, FileEnvStore};
use crate::error::{OpError, Result};
use crate::ops::report::render_text;
use crate::ops::{self, ConfAction, ConfReport, ConfRequest, Outcome};

/// Main handler for the conf command.
///
/// # Errors
///
/// Returns an error if the service cannot be resolved or the operation fails.
pub fn run_conf_command(args: &ConfArgs, config: &Config) -> Result<()> {
    let store = FileEnvStore::new();
    let output = match &args.subcommand {
        ConfSubcommand::List(target) => execute(&store, config, ConfAction::List, target, None, None),
        ConfSubcommand::Set(set) => execute(
            &store,
            config,
            ConfAction::Set,
            &set.target,
            set.key.as_deref(),
            set.value.as_deref(),
        ),
        ConfSubcommand::Delete(delete) => execute(
            &store,
            config,
            ConfAction::Delete,
            &delete.target,
            delete.key.as_deref(),
            None,
        ),
        ConfSubcommand::Services(services) => services_output(config, services.output),
    };

    match output {
        Ok(stdout) => {
            println!("{stdout}");
            Ok(())
        }
        Err(failure) => {
            if let Some(stdout) = failure.stdout {
                println!("{stdout}");
            }
            Err(failure.error)
        }
    }
}

/// A failed invocation: what to print on stdout (if anything) and the error.
#[derive(Debug)]
pub struct Failure {
    pub stdout: Option<String>,
    pub error: anyhow::Error,
}

impl From<anyhow::Error> for Failure {
    fn from(error: anyhow::Error) -> Self {
        Self {
            stdout: None,
            error,
        }
    }
}

/// Resolves the target file, runs `action` against `store` and renders the
/// result in the requested format.
///
/// # Errors
///
/// Returns a [`Failure`] if the service is unknown or the operation fails.
pub fn execute<S: EnvStore + ?Sized>(
    store: &S,
    config: &Config,
    action: ConfAction,
    target: &TargetArgs,
    key: Option<&str>,
    value: Option<&str>,
) -> std::result::Result<String, Failure> {
    let env_file = config
        .resolve_env_file(&target.service, target.env_file.as_deref())
        .map_err(anyhow::Error::from)?;

    let request = ConfRequest::builder()
        .service(target.service.as_str())
        .env_file(env_file)
        .maybe_key(key)
        .maybe_value(value)
        .dry_run(target.dry_run)
        .build();

    let result = ops::run(store, action, &request);
    if let Err(OpError::Commit(e)) = &result
        && e.requires_intervention()
    {
        error!(
            path = %request.env_file.display(),
            "environment file may be inconsistent, check the backup next to it"
        );
    }

    render(action, &request, result, target.output)
}

fn render(
    action: ConfAction,
    request: &ConfRequest,
    result: std::result::Result<Outcome, OpError>,
    format: OutputFormat,
) -> std::result::Result<String, Failure> {
    let stdout = match format {
        OutputFormat::Json => Some(
            ConfReport::new(action, request, &result)
                .to_json()
                .context("failed to serialize report")?,
        ),
        OutputFormat::Text => result.as_ref().ok().map(|outcome| render_text(request, outcome)),
    };

    match result {
        Ok(_) => Ok(stdout.unwrap_or_default()),
        Err(e) => Err(Failure {
            stdout,
            error: anyhow::Error::new(e).context(format!(
                "failed to {action} configuration for service '{}'",
                request.service
            )),
        }),
    }
}

fn services_output(config: &Config, format: OutputFormat) -> std::result::Result<String, Failure> {
    match format {
        OutputFormat::Text => Ok(config.format_services().join("\n")),
        OutputFormat::Json => {
            Ok(serde_json::to_string_pretty(&config.services).context("failed to serialize services")?)
        }
    }
}
