//! ReviewDesk command-line entry point.
//!
//! # Responsibility
//! - Parse arguments and environment into typed commands.
//! - Initialize file logging when a log directory is configured.
//! - Print results as JSON on stdout and failures as JSON on stderr.

mod args;
mod commands;
mod error;

use args::{Cli, GlobalOpts};
use clap::Parser;
use error::CliError;
use log::{info, warn};
use reviewdesk_core::{default_log_level, init_logging, LoggingConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = setup_logging(&cli.global).and_then(|()| {
        info!(
            "event=cli_start module=cli status=ok version={}",
            reviewdesk_core::core_version()
        );
        commands::run(&cli.global.db, cli.command)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            warn!(
                "event=cli_command module=cli status=error error_code={}",
                err.code()
            );
            let body = serde_json::json!({
                "error": {
                    "kind": err.kind().as_str(),
                    "code": err.code(),
                    "message": err.to_string(),
                }
            });
            eprintln!("{body}");
            err.exit_code()
        }
    }
}

fn setup_logging(global: &GlobalOpts) -> Result<(), CliError> {
    let Some(log_dir) = &global.log_dir else {
        return Ok(());
    };
    let log_dir = if log_dir.is_absolute() {
        log_dir.clone()
    } else {
        std::env::current_dir()?.join(log_dir)
    };

    // stderr carries only the JSON error object; events stay in the files.
    let config = LoggingConfig::new(global.log_level.unwrap_or_else(default_log_level), log_dir);
    init_logging(&config)?;
    Ok(())
}
