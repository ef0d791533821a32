// CLI module - process entry points

pub mod migrate;
pub mod seed;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::{JwtSettings, SecretManager, SeedSettings, ServerSettings, SystemEnvironment};

/// Gatekeeper RBAC administration backend
#[derive(Parser)]
#[command(name = "gatekeeper")]
#[command(about = "Gatekeeper RBAC administration backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Migrate, seed and serve the HTTP API (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Migrate, run the idempotent seed and exit
    Seed,
}

/// Execute CLI command
///
/// Settings and secrets are read from the environment here; a bad value
/// aborts before any connection is opened.
pub async fn execute_command(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let env = SystemEnvironment;
    let server_settings = ServerSettings::from_env_provider(&env)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Migrate => {
            migrate::run_migrations(&server_settings).await?;
        }
        Commands::Seed => {
            let jwt_settings = JwtSettings::from_env_provider(&env)?;
            let seed_settings = SeedSettings::from_env_provider(&env)?;
            let secret_manager = SecretManager::init()?;

            seed::run_seed(&server_settings, jwt_settings, secret_manager, seed_settings).await?;
        }
        Commands::Serve => {
            let jwt_settings = JwtSettings::from_env_provider(&env)?;
            let seed_settings = SeedSettings::from_env_provider(&env)?;
            let secret_manager = SecretManager::init()?;

            serve::run_server(server_settings, jwt_settings, secret_manager, seed_settings).await?;
        }
    }

    Ok(())
}
