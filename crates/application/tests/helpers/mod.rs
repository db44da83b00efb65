#![allow(dead_code)]

use async_trait::async_trait;
use ironwall_application::ports::{
    BypassCheckPort, FilterListMatch, FilterListPort, NetEnvPort, PeerLookupPort, PromptDecision,
    PromptPort,
};
use ironwall_domain::{
    Connection, DomainError, EndpointMatch, EndpointReason, Entity, OnlineStatus, PacketInfo,
    ProcessInfo,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

// ============================================================================
// Mock FilterListPort
// ============================================================================

pub struct MockFilterList {
    loaded: AtomicBool,
    by_domain: RwLock<HashMap<String, Vec<String>>>,
    by_ip: RwLock<HashMap<String, Vec<String>>>,
    lookups: AtomicUsize,
    fail_lookups: AtomicBool,
}

impl MockFilterList {
    pub fn new() -> Self {
        Self {
            loaded: AtomicBool::new(true),
            by_domain: RwLock::new(HashMap::new()),
            by_ip: RwLock::new(HashMap::new()),
            lookups: AtomicUsize::new(0),
            fail_lookups: AtomicBool::new(false),
        }
    }

    pub fn set_loaded(&self, loaded: bool) {
        self.loaded.store(loaded, Ordering::SeqCst);
    }

    pub fn set_fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    pub async fn add_domain(&self, domain: &str, lists: &[&str]) {
        self.by_domain.write().await.insert(
            domain.to_string(),
            lists.iter().map(|s| s.to_string()).collect(),
        );
    }

    pub async fn add_ip(&self, ip: &str, lists: &[&str]) {
        self.by_ip.write().await.insert(
            ip.to_string(),
            lists.iter().map(|s| s.to_string()).collect(),
        );
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    async fn categories(&self, entity: &Entity) -> Vec<String> {
        let mut categories = Vec::new();
        let domain = entity.canonical_domain();
        if !domain.is_empty() {
            if let Some(lists) = self.by_domain.read().await.get(domain) {
                categories.extend(lists.iter().cloned());
            }
        }
        if let Some(ip) = entity.ip {
            if let Some(lists) = self.by_ip.read().await.get(&ip.to_string()) {
                categories.extend(lists.iter().cloned());
            }
        }
        categories
    }
}

impl Default for MockFilterList {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FilterListPort for MockFilterList {
    async fn entity_categories(&self, entity: &Entity) -> Result<Vec<String>, DomainError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("mock lookup failure".to_string()));
        }
        Ok(self.categories(entity).await)
    }

    async fn match_entity(
        &self,
        entity: &Entity,
        active: &[String],
    ) -> Result<FilterListMatch, DomainError> {
        let categories = self.entity_categories(entity).await?;
        let active: HashSet<&String> = active.iter().collect();
        let matched: Vec<String> = categories
            .into_iter()
            .filter(|c| active.contains(c))
            .collect();
        if matched.is_empty() {
            return Ok(FilterListMatch::no_match());
        }
        Ok(FilterListMatch {
            result: EndpointMatch::Denied,
            reason: EndpointReason {
                message: format!("matches filter list: {}", matched.join(", ")),
                context: None,
            },
            matched,
        })
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Mock PeerLookupPort
// ============================================================================

pub struct MockPeerLookup {
    peer: RwLock<Option<Arc<ProcessInfo>>>,
    should_fail: AtomicBool,
}

impl MockPeerLookup {
    pub fn new() -> Self {
        Self {
            peer: RwLock::new(None),
            should_fail: AtomicBool::new(false),
        }
    }

    pub async fn set_peer(&self, peer: Arc<ProcessInfo>) {
        *self.peer.write().await = Some(peer);
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }
}

impl Default for MockPeerLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PeerLookupPort for MockPeerLookup {
    async fn lookup_local_peer(
        &self,
        _packet: &PacketInfo,
    ) -> Result<Option<Arc<ProcessInfo>>, DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::PeerLookupFailed("mock failure".to_string()));
        }
        Ok(self.peer.read().await.clone())
    }
}

// ============================================================================
// Mock NetEnvPort
// ============================================================================

pub struct MockNetEnv {
    status: std::sync::Mutex<OnlineStatus>,
    connectivity_domains: std::sync::Mutex<HashSet<String>>,
}

impl MockNetEnv {
    pub fn new(status: OnlineStatus) -> Self {
        Self {
            status: std::sync::Mutex::new(status),
            connectivity_domains: std::sync::Mutex::new(HashSet::new()),
        }
    }

    pub fn set_status(&self, status: OnlineStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub fn add_connectivity_domain(&self, domain: &str) {
        self.connectivity_domains
            .lock()
            .unwrap()
            .insert(domain.to_string());
    }
}

impl NetEnvPort for MockNetEnv {
    fn online_status(&self) -> OnlineStatus {
        *self.status.lock().unwrap()
    }

    fn is_connectivity_domain(&self, domain: &str) -> bool {
        self.connectivity_domains.lock().unwrap().contains(domain)
    }
}

// ============================================================================
// Mock BypassCheckPort
// ============================================================================

pub struct MockBypass {
    result: std::sync::Mutex<(EndpointMatch, String)>,
}

impl MockBypass {
    pub fn new() -> Self {
        Self {
            result: std::sync::Mutex::new((EndpointMatch::NoMatch, String::new())),
        }
    }

    pub fn set_result(&self, result: EndpointMatch, message: &str) {
        *self.result.lock().unwrap() = (result, message.to_string());
    }
}

impl Default for MockBypass {
    fn default() -> Self {
        Self::new()
    }
}

impl BypassCheckPort for MockBypass {
    fn check(&self, _conn: &Connection) -> (EndpointMatch, EndpointReason) {
        let (result, message) = self.result.lock().unwrap().clone();
        (
            result,
            EndpointReason {
                message,
                context: None,
            },
        )
    }
}

// ============================================================================
// Mock PromptPort
// ============================================================================

pub struct MockPrompt {
    decision: std::sync::Mutex<PromptDecision>,
    prompted: AtomicUsize,
    /// When set, `prompt` never returns; used to test cancellation.
    hang: AtomicBool,
}

impl MockPrompt {
    pub fn new(decision: PromptDecision) -> Self {
        Self {
            decision: std::sync::Mutex::new(decision),
            prompted: AtomicUsize::new(0),
            hang: AtomicBool::new(false),
        }
    }

    pub fn set_hang(&self) {
        self.hang.store(true, Ordering::SeqCst);
    }

    pub fn prompt_count(&self) -> usize {
        self.prompted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PromptPort for MockPrompt {
    async fn prompt(&self, _conn: &Connection) -> PromptDecision {
        self.prompted.fetch_add(1, Ordering::SeqCst);
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        *self.decision.lock().unwrap()
    }
}
