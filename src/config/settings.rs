use crate::config::config_spec::ConfigSpec;
use crate::config::env_provider::EnvironmentProvider;
use crate::config::errors::ConfigError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://gatekeeper.db?mode=rwc";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:3001";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@gatekeeperhq.com";

/// Listener, database and CORS settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl ServerSettings {
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let database_url = ConfigSpec::new("DATABASE_URL")
            .default_value(DEFAULT_DATABASE_URL)
            .load_value(env)?;

        let host = ConfigSpec::new("HOST").default_value("0.0.0.0").load_value(env)?;

        let port = ConfigSpec::new("PORT").default_value("3000").load_value(env)?;
        let port = ConfigSpec::parse_port(&port, "PORT")?;

        let origins = ConfigSpec::new("CORS_ALLOWED_ORIGINS")
            .default_value(DEFAULT_CORS_ORIGINS)
            .load_value(env)?;

        Ok(Self {
            database_url,
            host,
            port,
            cors_allowed_origins: ConfigSpec::parse_list(&origins),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Token issuance parameters
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub issuer: String,
    pub audience: String,
    pub expiration_minutes: i64,
}

impl JwtSettings {
    pub fn new(issuer: &str, audience: &str, expiration_minutes: i64) -> Self {
        Self {
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            expiration_minutes,
        }
    }

    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let issuer = ConfigSpec::new("JWT_ISSUER")
            .default_value("gatekeeper")
            .load_value(env)?;
        let audience = ConfigSpec::new("JWT_AUDIENCE")
            .default_value("gatekeeper-clients")
            .load_value(env)?;
        let expiration = ConfigSpec::new("JWT_EXPIRATION_MINUTES")
            .default_value("30")
            .load_value(env)?;
        let expiration_minutes =
            ConfigSpec::parse_positive_integer(&expiration, "JWT_EXPIRATION_MINUTES")?;

        Ok(Self {
            issuer,
            audience,
            expiration_minutes,
        })
    }
}

/// Initial admin account used by the seeder
#[derive(Clone)]
pub struct SeedSettings {
    pub admin_email: String,
    pub admin_password: Option<String>,
}

impl SeedSettings {
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let admin_email = ConfigSpec::new("ADMIN_EMAIL")
            .default_value(DEFAULT_ADMIN_EMAIL)
            .load_value(env)?;
        let admin_password = ConfigSpec::new("ADMIN_PASSWORD").load(env).map(|v| v.value);

        Ok(Self {
            admin_email,
            admin_password,
        })
    }
}

impl std::fmt::Debug for SeedSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedSettings")
            .field("admin_email", &self.admin_email)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
