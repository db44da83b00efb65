use crate::endpoint::EndpointRule;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::{RwLock, RwLockReadGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultAction {
    #[default]
    NotSet,
    Permit,
    Ask,
    Block,
}

/// Effective configuration of a layered profile after merging all layers.
/// The layer composition machinery lives outside the decision core; the
/// core only consumes the merged result.
#[derive(Debug, Clone, Default)]
pub struct ProfileSettings {
    pub block_inbound: bool,
    pub block_p2p: bool,
    pub block_scope_internet: bool,
    pub block_scope_lan: bool,
    pub block_scope_local: bool,
    pub prevent_bypassing: bool,
    pub domain_heuristics: bool,
    pub disable_auto_permit: bool,
    pub remove_out_of_scope_dns: bool,
    pub default_action: DefaultAction,
    /// Rules for outgoing connections, in evaluation order.
    pub endpoints: Vec<EndpointRule>,
    /// Rules for incoming connections, in evaluation order.
    pub service_endpoints: Vec<EndpointRule>,
    /// Active filter-list source IDs.
    pub filter_lists: Vec<String>,
}

/// Stack of per-application and global profile layers, presented as one
/// effective configuration behind a usage lock.
///
/// The revision counter is strictly monotonic: it starts at 1 and every
/// `update` bumps it, whether or not a recomposed configuration was
/// pending. Decision calls snapshot the counter so cached verdicts can be
/// invalidated when the profile changes.
#[derive(Debug)]
pub struct LayeredProfile {
    settings: RwLock<ProfileSettings>,
    pending: Mutex<Option<ProfileSettings>>,
    revision: AtomicU64,
    needs_update: AtomicBool,
}

impl LayeredProfile {
    pub fn new(settings: ProfileSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
            pending: Mutex::new(None),
            revision: AtomicU64::new(1),
            needs_update: AtomicBool::new(false),
        }
    }

    pub fn revision_cnt(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update.load(Ordering::Acquire)
    }

    /// Stages a recomposed configuration; it becomes effective on the next
    /// `update` call.
    pub fn mark_for_update(&self, settings: ProfileSettings) {
        *self.pending.lock().expect("profile pending lock poisoned") = Some(settings);
        self.needs_update.store(true, Ordering::Release);
    }

    /// Applies any staged configuration and bumps the revision counter.
    /// Returns the new counter value.
    pub async fn update(&self) -> u64 {
        let pending = self
            .pending
            .lock()
            .expect("profile pending lock poisoned")
            .take();
        if let Some(new_settings) = pending {
            let mut guard = self.settings.write().await;
            *guard = new_settings;
        }
        self.needs_update.store(false, Ordering::Release);
        self.revision.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Read-locks the effective configuration for the duration of a
    /// pipeline run. Readers overlap freely; `update` excludes them.
    pub async fn lock_for_usage(&self) -> RwLockReadGuard<'_, ProfileSettings> {
        self.settings.read().await
    }
}
