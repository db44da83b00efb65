use ironwall_application::{DecideOnConnection, DecideOnResolvedDns};
use ironwall_domain::Config;
use ironwall_infrastructure::bypass::DnsBypassCheck;
use ironwall_infrastructure::events::{EventBus, WarningEmitter, WarningEvent};
use ironwall_infrastructure::filterlists::{FilterListMatcher, FilterListModule, FilterListStore};
use ironwall_infrastructure::netenv::TrackedNetEnv;
use ironwall_infrastructure::prompt::{ChannelPrompt, PromptRequest};
use ironwall_infrastructure::system::ProcPeerLookup;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// The wired decision core: pipeline use cases, the filter-list module,
/// and the channels external subsystems attach to.
pub struct FirewallServices {
    pub decide_on_connection: Arc<DecideOnConnection>,
    pub decide_on_resolved_dns: Arc<DecideOnResolvedDns>,
    pub filterlist_module: Arc<FilterListModule>,
    pub netenv: Arc<TrackedNetEnv>,
    pub event_bus: EventBus,
    pub prompt_requests: mpsc::Receiver<PromptRequest>,
    pub warnings: mpsc::UnboundedReceiver<WarningEvent>,
}

impl FirewallServices {
    pub async fn new(config: &Config, write_pool: SqlitePool) -> anyhow::Result<Self> {
        let event_bus = EventBus::new();
        let (warning_emitter, warnings) = WarningEmitter::new_enabled();

        let store = FilterListStore::new(write_pool);
        store.init_schema().await?;
        let filterlist_module = Arc::new(FilterListModule::new(store, warning_emitter));
        let filter_lists = Arc::new(FilterListMatcher::new(filterlist_module.clone()));

        let netenv = Arc::new(TrackedNetEnv::new(event_bus.clone()));
        let (prompt, prompt_requests) =
            ChannelPrompt::new(Duration::from_secs(config.firewall.prompt_timeout_secs));

        let decide_on_connection = Arc::new(DecideOnConnection::new(
            filter_lists.clone(),
            Arc::new(ProcPeerLookup::new()),
            netenv.clone(),
            Arc::new(DnsBypassCheck::new()),
            Arc::new(prompt),
            std::process::id() as i32,
        ));
        let decide_on_resolved_dns = Arc::new(DecideOnResolvedDns::new(filter_lists));

        Ok(Self {
            decide_on_connection,
            decide_on_resolved_dns,
            filterlist_module,
            netenv,
            event_bus,
            prompt_requests,
            warnings,
        })
    }
}
