use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::{
    JwtSettings, SecretManager, SeedSettings, ServerSettings, connect_database, migrate_database,
};
use crate::services::{SeedReport, Seeder};

/// Migrate and seed without starting the server
pub async fn run_seed(
    server_settings: &ServerSettings,
    jwt_settings: JwtSettings,
    secret_manager: SecretManager,
    seed_settings: SeedSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = connect_database(&server_settings.database_url).await?;
    migrate_database(&db).await?;

    let app_data = Arc::new(AppData::new(db, jwt_settings, secret_manager));
    let report = Seeder::new(app_data, seed_settings).seed().await?;

    print_seed_report(&report);

    Ok(())
}

/// Print the seeding outcome; a generated admin password is shown only here
pub fn print_seed_report(report: &SeedReport) {
    println!("\n=== Gatekeeper Seed ===");
    println!("  Permissions created: {}", report.permissions_created);
    println!("  Roles created:       {}", report.roles_created);

    match &report.admin {
        Some(admin) => {
            println!("\n✓ Admin account created");
            println!("  Email:    {}", admin.email);
            if let Some(password) = &admin.generated_password {
                println!("  Password: {}", password);
                println!("\n⚠️  This password is shown once. Store it securely.");
            }
        }
        None => println!("  Admin account:       unchanged"),
    }
    println!();
}
