use ironwall_domain::Config;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    fmt().with_env_filter(filter).init();
}
