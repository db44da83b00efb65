use ironwall_domain::OnlineStatus;

/// View of the network environment: current connectivity status and the
/// well-known captive-portal / bootstrap domain allowlist.
pub trait NetEnvPort: Send + Sync {
    fn online_status(&self) -> OnlineStatus;
    fn is_connectivity_domain(&self, domain: &str) -> bool;
}
