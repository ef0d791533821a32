use clap::Parser;

use gatekeeper_backend::cli::{Cli, execute_command};
use gatekeeper_backend::config::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    execute_command(cli).await
}
