use serde::{Deserialize, Serialize};

use super::database::DatabaseConfig;
use super::errors::ConfigError;
use super::firewall::FirewallConfig;
use super::logging::LoggingConfig;
use super::server::ServerConfig;

/// Main configuration structure for Ironwall
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub firewall: FirewallConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ironwall.toml in current directory
    /// 3. /etc/ironwall/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("ironwall.toml").exists() {
            Self::from_file("ironwall.toml")?
        } else if std::path::Path::new("/etc/ironwall/config.toml").exists() {
            Self::from_file("/etc/ironwall/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(dir) = overrides.data_dir {
            self.server.data_dir = dir;
        }
        if let Some(db) = overrides.database_path {
            self.database.path = db;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.firewall.default_action.as_str() {
            "permit" | "ask" | "block" => {}
            other => {
                return Err(ConfigError::Validation(format!(
                    "unknown default action '{other}'"
                )))
            }
        }
        if self.database.path.is_empty() {
            return Err(ConfigError::Validation(
                "database path cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub data_dir: Option<String>,
    pub database_path: Option<String>,
    pub log_level: Option<String>,
}
