use crate::config::env_provider::EnvironmentProvider;
use crate::config::errors::ConfigError;

/// Where a setting's value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValueSource {
    EnvironmentVariable { name: String },
    Default,
}

#[derive(Debug, Clone)]
pub struct ConfigValue {
    pub value: String,
    pub source: ConfigValueSource,
}

/// Specification for a single environment-backed setting
///
/// Priority is environment variable → default. A blank environment value
/// counts as unset.
pub struct ConfigSpec {
    pub env_var: String,
    pub default_value: Option<String>,
}

impl ConfigSpec {
    pub fn new(env_var: &str) -> Self {
        Self {
            env_var: env_var.to_string(),
            default_value: None,
        }
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    /// Resolve the setting, returning `None` when unset with no default
    pub fn load(&self, env: &dyn EnvironmentProvider) -> Option<ConfigValue> {
        let from_env = env
            .get_var(&self.env_var)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        match (from_env, &self.default_value) {
            (Some(value), _) => Some(ConfigValue {
                value,
                source: ConfigValueSource::EnvironmentVariable {
                    name: self.env_var.clone(),
                },
            }),
            (None, Some(default)) => Some(ConfigValue {
                value: default.clone(),
                source: ConfigValueSource::Default,
            }),
            (None, None) => None,
        }
    }

    /// Resolve a setting that must end up with a value
    pub fn load_value(&self, env: &dyn EnvironmentProvider) -> Result<String, ConfigError> {
        self.load(env)
            .map(|v| v.value)
            .ok_or_else(|| ConfigError::MissingRequiredSetting {
                setting_name: self.env_var.clone(),
            })
    }

    pub fn parse_port(value: &str, setting_name: &str) -> Result<u16, ConfigError> {
        let port = value.trim().parse::<u16>().map_err(|e| {
            ConfigError::parse(
                setting_name,
                format!("Expected port number (1-65535), got '{}': {}", value, e),
            )
        })?;

        if port == 0 {
            return Err(ConfigError::invalid(
                setting_name,
                "Port number must be between 1 and 65535",
            ));
        }

        Ok(port)
    }

    pub fn parse_positive_integer(value: &str, setting_name: &str) -> Result<i64, ConfigError> {
        let parsed = value.trim().parse::<i64>().map_err(|e| {
            ConfigError::parse(setting_name, format!("Expected integer, got '{}': {}", value, e))
        })?;

        if parsed <= 0 {
            return Err(ConfigError::invalid(setting_name, "Value must be greater than 0"));
        }

        Ok(parsed)
    }

    /// Split a comma separated list, dropping blank entries
    pub fn parse_list(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}
