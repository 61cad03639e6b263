//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::AppResult;

/// Execute a CLI command with the given settings
///
/// This function dispatches to the appropriate command handler based on
/// the parsed CLI arguments.
///
/// # Arguments
/// * `cli` - Parsed CLI arguments
/// * `settings` - Merged and validated settings
///
/// # Errors
/// Returns errors from command handlers or validation failures
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    validate_command_args(cli, &settings)?;

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) if *dry_run => {
            ServeCommandHandler::new(settings).execute(true).await
        }
        Some(Commands::Serve { .. }) | None => {
            // Return Ok to signal that server should start
            // Actual server startup is handled in main.rs
            Ok(())
        }
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await
        }
    }
}

/// Validate command arguments and configuration before execution
fn validate_command_args(cli: &Cli, _settings: &Settings) -> AppResult<()> {
    if let Err(msg) = cli.validate() {
        return Err(crate::error::AppError::Validation {
            field: "cli_arguments".to_string(),
            reason: msg,
        });
    }

    if let Some(ref command) = cli.command {
        match command {
            Commands::Serve {
                host,
                port,
                log_level: _,
                dry_run: _,
            } => {
                validate_serve_args(host.as_ref(), *port)?;
            }
            Commands::Migrate {
                dry_run: _,
                rollback,
            } => {
                validate_migrate_args(*rollback)?;
            }
        }
    }

    Ok(())
}

/// Validate serve command arguments
fn validate_serve_args(host: Option<&String>, port: Option<u16>) -> AppResult<()> {
    if let (Some(host_addr), Some(port_num)) = (host, port) {
        if port_num < 1024 && host_addr == "0.0.0.0" {
            eprintln!(
                "Warning: Binding to 0.0.0.0 on port {} requires root privileges",
                port_num
            );
        }

        if host_addr == "localhost" && port_num == 80 {
            eprintln!("Warning: Using port 80 with localhost may conflict with other services");
        }
    }

    Ok(())
}

/// Validate migrate command arguments
fn validate_migrate_args(rollback: Option<u32>) -> AppResult<()> {
    if let Some(steps) = rollback
        && steps > 50
    {
        eprintln!(
            "Warning: Rolling back {} migrations is a large operation. Consider using smaller steps.",
            steps
        );
    }

    Ok(())
}
