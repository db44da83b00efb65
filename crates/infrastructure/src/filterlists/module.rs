use super::snapshot::FilterListSnapshot;
use super::store::FilterListStore;
use crate::events::{WarningEmitter, WarningEvent};
use arc_swap::ArcSwapOption;
use ironwall_domain::DomainError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const WARN_DISABLED: &str = "filterlists:disabled";
pub const WARN_UPDATE_FAILED: &str = "filterlists:update-failed";
pub const WARN_STALE_DATA: &str = "filterlists:staledata";
pub const WARN_UPDATE_IN_PROGRESS: &str = "filterlists:update-in-progress";

/// Process-wide state of the filter-list subsystem: the live snapshot,
/// the update mutex, the one-shot loaded barrier, and the event ignore
/// flags. Test harnesses instantiate their own.
pub struct FilterListModule {
    store: FilterListStore,
    snapshot: ArcSwapOption<FilterListSnapshot>,
    update_lock: Mutex<()>,
    loaded: StdMutex<watch::Sender<bool>>,
    warnings: WarningEmitter,
    ignore_update_events: AtomicBool,
    ignore_netenv_events: AtomicBool,
}

impl FilterListModule {
    pub fn new(store: FilterListStore, warnings: WarningEmitter) -> Self {
        let (loaded_tx, _) = watch::channel(false);
        Self {
            store,
            snapshot: ArcSwapOption::const_empty(),
            update_lock: Mutex::new(()),
            loaded: StdMutex::new(loaded_tx),
            warnings,
            ignore_update_events: AtomicBool::new(false),
            ignore_netenv_events: AtomicBool::new(false),
        }
    }

    /// Loads the snapshot from the cache database. When no usable cache
    /// exists yet the module stays unloaded and a user-visible warning is
    /// posted; the first successful update opens the barrier.
    pub async fn start(&self) -> Result<(), DomainError> {
        match FilterListSnapshot::compile(&self.store).await {
            Ok(snapshot) => {
                self.install_snapshot(snapshot);
                info!("filterlists: using cache database");
            }
            Err(e) => {
                debug!(error = %e, "filterlists: disabled, waiting for update");
                self.warn_disabled();
            }
        }
        Ok(())
    }

    /// Replaces the loaded barrier with a fresh closed one. Consumers must
    /// re-subscribe after a restart.
    pub fn stop(&self) {
        let (loaded_tx, _) = watch::channel(false);
        *self.loaded.lock().expect("loaded barrier lock poisoned") = loaded_tx;
        self.snapshot.store(None);
    }

    pub fn snapshot(&self) -> Option<Arc<FilterListSnapshot>> {
        self.snapshot.load_full()
    }

    pub fn is_loaded(&self) -> bool {
        *self
            .loaded
            .lock()
            .expect("loaded barrier lock poisoned")
            .borrow()
    }

    /// Subscription to the loaded barrier; receives `true` once the first
    /// snapshot is installed.
    pub fn loaded_signal(&self) -> watch::Receiver<bool> {
        self.loaded
            .lock()
            .expect("loaded barrier lock poisoned")
            .subscribe()
    }

    pub fn set_ignore_update_events(&self, ignore: bool) {
        self.ignore_update_events.store(ignore, Ordering::SeqCst);
    }

    pub fn set_ignore_netenv_events(&self, ignore: bool) {
        self.ignore_netenv_events.store(ignore, Ordering::SeqCst);
    }

    /// Handler for resource-update events from the update subsystem.
    pub async fn handle_resource_update(
        &self,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        if self.ignore_update_events.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.try_list_update(cancel).await
    }

    /// Handler for online-status events; only an offline→online transition
    /// reaches this point.
    pub async fn handle_online(&self, cancel: &CancellationToken) -> Result<(), DomainError> {
        if self.ignore_netenv_events.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.try_list_update(cancel).await
    }

    /// Attempts to rebuild and swap the live snapshot. At most one update
    /// runs at a time; triggers arriving while one is in flight coalesce
    /// into it. On failure the previous snapshot stays live.
    pub async fn try_list_update(&self, cancel: &CancellationToken) -> Result<(), DomainError> {
        let Ok(_guard) = self.update_lock.try_lock() else {
            debug!("filterlists: update already in progress, coalescing trigger");
            return Ok(());
        };

        self.warnings.emit(WarningEvent::post(
            WARN_UPDATE_IN_PROGRESS,
            "Filter Lists Update In Progress",
            "The filter list cache is being rebuilt.",
        ));

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DomainError::Cancelled),
            result = FilterListSnapshot::compile(&self.store) => result,
        };

        match result {
            Ok(snapshot) => {
                self.install_snapshot(snapshot);
                self.warnings.emit(WarningEvent::resolve(WARN_UPDATE_IN_PROGRESS));
                self.warnings.emit(WarningEvent::resolve(WARN_UPDATE_FAILED));
                self.warnings.emit(WarningEvent::resolve(WARN_DISABLED));
                info!("filterlists: update completed");

                self.check_stale_data().await;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "filterlists: update failed, retaining previous data");
                self.warnings.emit(WarningEvent::resolve(WARN_UPDATE_IN_PROGRESS));
                self.warnings.emit(WarningEvent::post(
                    WARN_UPDATE_FAILED,
                    "Filter Lists Update Failed",
                    "The last filter list update attempt failed. The previous filter list data is still being used.",
                ));
                Err(e)
            }
        }
    }

    fn install_snapshot(&self, snapshot: FilterListSnapshot) {
        self.snapshot.store(Some(Arc::new(snapshot)));
        let loaded = self.loaded.lock().expect("loaded barrier lock poisoned");
        loaded.send_replace(true);
    }

    async fn check_stale_data(&self) {
        match self.store.stale_entry_count().await {
            Ok(0) => {}
            Ok(stale) => {
                warn!(rows = stale, "filterlists: stale rows survived the update");
                self.warnings.emit(WarningEvent::post(
                    WARN_STALE_DATA,
                    "Filter Lists Cache Holds Stale Data",
                    format!("{stale} outdated entries were not replaced by the last update."),
                ));
            }
            Err(e) => {
                warn!(error = %e, "filterlists: stale data check failed");
            }
        }
    }

    fn warn_disabled(&self) {
        self.warnings.emit(WarningEvent::post(
            WARN_DISABLED,
            "Filter Lists Are Initializing",
            "Filter lists are being downloaded and set up in the background. \
             Until this initialization is finished, the filter lists are disabled \
             and will not block anything.",
        ));
    }
}
