use super::types::{FirewallEvent, WarningEvent};
use tokio::sync::{broadcast, mpsc};

const EVENT_BUS_CAPACITY: usize = 64;

/// Broadcast bus for operational events. Subscribers that lag simply miss
/// events; filter-list updates are idempotent.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<FirewallEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUS_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FirewallEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: FirewallEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct WarningEmitter {
    sender: Option<mpsc::UnboundedSender<WarningEvent>>,
}

impl WarningEmitter {
    pub fn new_disabled() -> Self {
        Self { sender: None }
    }

    pub fn new_enabled() -> (Self, mpsc::UnboundedReceiver<WarningEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { sender: Some(tx) }, rx)
    }

    pub fn emit(&self, event: WarningEvent) {
        if let Some(ref tx) = self.sender {
            let _ = tx.send(event);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }
}

impl Default for WarningEmitter {
    fn default() -> Self {
        Self::new_disabled()
    }
}

impl std::fmt::Debug for WarningEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarningEmitter")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
