use clap::Parser;
use ironwall_application::ports::PromptDecision;
use ironwall_domain::CliOverrides;
use ironwall_jobs::{FilterListUpdateJob, JobRunner};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod bootstrap;
mod di;

#[derive(Parser)]
#[command(name = "ironwall")]
#[command(version = "0.1.0")]
#[command(about = "Ironwall - host-based application firewall decision core")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Data directory
    #[arg(long)]
    data_dir: Option<String>,

    /// Database path
    #[arg(long)]
    database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        data_dir: cli.data_dir.clone(),
        database_path: cli.database.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    info!("Starting Ironwall v{}", env!("CARGO_PKG_VERSION"));

    let database_url = format!("sqlite:{}", config.database.path);
    let (write_pool, _read_pool) = bootstrap::init_database(&database_url, &config.database).await?;

    let services = di::FirewallServices::new(&config, write_pool).await?;
    services.filterlist_module.start().await?;

    let shutdown = CancellationToken::new();

    let update_job = FilterListUpdateJob::new(
        services.filterlist_module.clone(),
        services.event_bus.clone(),
    )
    .with_debounce(Duration::from_secs(
        config.firewall.filterlist_update_debounce_secs,
    ));
    JobRunner::new()
        .with_filterlist_update(update_job)
        .with_shutdown_token(shutdown.clone())
        .start()
        .await;

    // Surface module warnings in the log until a UI attaches.
    let mut warnings = services.warnings;
    tokio::spawn(async move {
        while let Some(warning) = warnings.recv().await {
            if warning.resolved {
                info!(code = warning.code, "warning resolved");
            } else {
                warn!(code = warning.code, title = %warning.title, "{}", warning.message);
            }
        }
    });

    // Deny pending prompts until the decision UI is connected.
    let mut prompts = services.prompt_requests;
    tokio::spawn(async move {
        while let Some(request) = prompts.recv().await {
            warn!(
                process = %request.process_name,
                domain = %request.domain,
                "no decision UI attached, denying prompt"
            );
            let _ = request.reply.send(PromptDecision::Deny);
        }
    });

    info!("Decision core ready; waiting for packet and DNS ingress");

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    shutdown.cancel();
    services.filterlist_module.stop();

    Ok(())
}
