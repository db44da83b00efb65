use ironwall_infrastructure::events::{EventBus, FirewallEvent};
use ironwall_infrastructure::filterlists::FilterListModule;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Background job that keeps the filter-list cache current.
///
/// Subscribes to the operational event bus and dispatches an update
/// attempt when blocklist artifacts are refreshed or when the network
/// environment transitions to online. Triggers within the debounce window
/// of the previous attempt are skipped; triggers during a running update
/// coalesce inside the module.
pub struct FilterListUpdateJob {
    module: Arc<FilterListModule>,
    bus: EventBus,
    debounce: Duration,
    shutdown: CancellationToken,
}

impl FilterListUpdateJob {
    pub fn new(module: Arc<FilterListModule>, bus: EventBus) -> Self {
        Self {
            module,
            bus,
            debounce: Duration::from_secs(60),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(debounce_secs = self.debounce.as_secs(), "Starting filter list update job");

        let mut events = self.bus.subscribe();
        let mut last_attempt: Option<Instant> = None;

        loop {
            let event = tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("FilterListUpdateJob: shutting down");
                    return;
                }
                event = events.recv() => event,
            };

            let event = match event {
                Ok(event) => event,
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "FilterListUpdateJob: lagged behind event bus");
                    continue;
                }
                Err(RecvError::Closed) => {
                    info!("FilterListUpdateJob: event bus closed");
                    return;
                }
            };

            if let Some(previous) = last_attempt {
                if previous.elapsed() < self.debounce {
                    debug!("FilterListUpdateJob: trigger within debounce window, skipping");
                    continue;
                }
            }

            let result = match event {
                FirewallEvent::ResourceUpdated { resource } => {
                    debug!(resource = %resource, "FilterListUpdateJob: resource updated");
                    self.module.handle_resource_update(&self.shutdown).await
                }
                FirewallEvent::OnlineStatusChanged { status } => {
                    debug!(?status, "FilterListUpdateJob: network came online");
                    self.module.handle_online(&self.shutdown).await
                }
            };

            last_attempt = Some(Instant::now());
            if let Err(e) = result {
                warn!(error = %e, "FilterListUpdateJob: update attempt failed");
            }
        }
    }
}
