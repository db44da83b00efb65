mod database;
mod errors;
mod firewall;
mod logging;
mod root;
mod server;

pub use database::DatabaseConfig;
pub use errors::ConfigError;
pub use firewall::FirewallConfig;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
