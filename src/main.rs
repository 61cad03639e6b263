use clap::Parser;

use strata_rs::cli::{self, Cli, Commands};
use strata_rs::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Apply the environment override before configuration loading so the
    // loader picks the matching {environment}.toml layer
    if let Some(env) = &cli.env {
        let app_env: strata_rs::config::Environment = env.clone().into();
        unsafe {
            std::env::set_var("STRATA_APP_ENV", app_env.as_str());
        }
    }

    let settings = cli::load_and_merge_config(&cli)?;

    cli::init_logger_from_settings(&settings)?;

    cli::execute_command(&cli, settings.clone()).await?;

    // execute_command handled dry-run and migrate commands; a plain serve
    // invocation (or no subcommand) falls through to server startup
    let should_serve = match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => !dry_run,
        None => true,
        Some(Commands::Migrate { .. }) => false,
    };

    if should_serve {
        Server::new(settings).run().await?;
    }

    Ok(())
}
