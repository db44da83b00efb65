mod database;
mod logging;

pub use database::init_database;
pub use logging::init_logging;

use ironwall_domain::{CliOverrides, Config, ConfigError};

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> Result<Config, ConfigError> {
    let config = Config::load(path, overrides)?;
    config.validate()?;
    Ok(config)
}
