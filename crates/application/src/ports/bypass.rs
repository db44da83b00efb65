use ironwall_domain::{Connection, EndpointMatch, EndpointReason};

/// Bypass-prevention checks: connections that would let an application
/// resolve or tunnel around the firewall (e.g. third-party DNS-over-HTTPS).
pub trait BypassCheckPort: Send + Sync {
    fn check(&self, conn: &Connection) -> (EndpointMatch, EndpointReason);
}
