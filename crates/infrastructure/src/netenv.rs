use crate::events::{EventBus, FirewallEvent};
use ironwall_application::ports::NetEnvPort;
use ironwall_domain::OnlineStatus;
use std::collections::HashSet;
use std::sync::Mutex;

/// Hostnames operating systems contact to detect captive portals. These
/// get a special grant during network bootstrap so the portal check can
/// complete before any per-app rules resolve.
const CONNECTIVITY_DOMAINS: &[&str] = &[
    "captive.apple.com",
    "connectivitycheck.gstatic.com",
    "clients3.google.com",
    "detectportal.firefox.com",
    "www.msftconnecttest.com",
    "www.msftncsi.com",
    "nmcheck.gnome.org",
    "network-test.debian.org",
    "connectivity-check.ubuntu.com",
];

/// Tracked network environment. The probing machinery lives outside the
/// decision core; whoever observes a connectivity change pushes it here
/// and an event goes out on the bus when the environment comes online.
pub struct TrackedNetEnv {
    status: Mutex<OnlineStatus>,
    connectivity_domains: HashSet<String>,
    bus: EventBus,
}

impl TrackedNetEnv {
    pub fn new(bus: EventBus) -> Self {
        Self {
            status: Mutex::new(OnlineStatus::Unknown),
            connectivity_domains: CONNECTIVITY_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
            bus,
        }
    }

    pub fn with_extra_connectivity_domains(mut self, domains: &[&str]) -> Self {
        self.connectivity_domains
            .extend(domains.iter().map(|d| d.to_string()));
        self
    }

    /// Records a new status and emits an event only on the offline→online
    /// transition.
    pub fn set_online_status(&self, status: OnlineStatus) {
        let mut current = self.status.lock().expect("netenv status lock poisoned");
        let was_online = current.is_online();
        *current = status;
        drop(current);

        if !was_online && status.is_online() {
            self.bus.emit(FirewallEvent::OnlineStatusChanged { status });
        }
    }
}

impl NetEnvPort for TrackedNetEnv {
    fn online_status(&self) -> OnlineStatus {
        *self.status.lock().expect("netenv status lock poisoned")
    }

    fn is_connectivity_domain(&self, domain: &str) -> bool {
        self.connectivity_domains
            .contains(domain.trim_end_matches('.'))
    }
}
