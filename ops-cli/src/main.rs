//! `vigil` administration tool
//!
//! Usage:
//!   vigil module list [--installed]
//!   vigil role check operator host.delete
//!   vigil user can alice host.view --group operators
//!   DATABASE_URL=postgres://... vigil rememberme purge
//!
//! Check commands exit with status 1 when the answer is "no".

use anyhow::Context;
use auth_rememberme::PostgresRememberMeRepository;
use clap::Parser;
use ops_cli::{
    cli::{Cli, Command},
    commands, VigilConfig,
};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so tables on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = VigilConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    debug!(config = %cli.config.display(), "Configuration loaded");

    let output = match &cli.command {
        Command::Module(command) => commands::module(command, &config.load_catalog()?),
        Command::Role(command) => commands::role(command, &config.load_roles()?)?,
        Command::User(command) => commands::user(command, &config.load_roles()?),
        Command::Rememberme(command) => {
            let url = config.database_url(command.database().database_url.as_deref())?;
            let repository = PostgresRememberMeRepository::connect(&url, config.database.max_connections)
                .await
                .context("Failed to connect to the database")?;
            repository.migrate().await.context("Failed to apply migrations")?;

            commands::rememberme(command, &repository, &config.rememberme).await?
        }
    };

    print!("{}", output.text);
    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
