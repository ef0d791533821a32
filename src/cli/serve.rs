use poem::Server;
use poem::listener::TcpListener;
use std::sync::Arc;

use crate::api::build_app;
use crate::app_data::AppData;
use crate::cli::seed::print_seed_report;
use crate::config::{
    JwtSettings, SecretManager, SeedSettings, ServerSettings, connect_database, migrate_database,
};
use crate::services::Seeder;

/// Migrate, seed, then serve until the process is stopped
pub async fn run_server(
    server_settings: ServerSettings,
    jwt_settings: JwtSettings,
    secret_manager: SecretManager,
    seed_settings: SeedSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = connect_database(&server_settings.database_url).await?;
    migrate_database(&db).await?;

    let app_data = Arc::new(AppData::new(db, jwt_settings, secret_manager));

    let report = Seeder::new(app_data.clone(), seed_settings).seed().await?;
    if report.admin.is_some() || report.permissions_created > 0 {
        print_seed_report(&report);
    }

    let app = build_app(app_data, &server_settings);
    let bind_address = server_settings.bind_address();

    tracing::info!("Starting server on http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger", bind_address);

    Server::new(TcpListener::bind(bind_address)).run(app).await?;

    Ok(())
}
