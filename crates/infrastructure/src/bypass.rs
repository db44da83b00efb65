use ironwall_application::ports::BypassCheckPort;
use ironwall_domain::{Connection, ConnectionType, EndpointMatch, EndpointReason};
use serde_json::json;
use std::collections::HashSet;

const DNS_PORT: u16 = 53;
const DOT_PORT: u16 = 853;

/// Well-known public encrypted-DNS resolvers applications ship as
/// built-in escape hatches.
const DOH_DOMAINS: &[&str] = &[
    "dns.google",
    "dns.google.com",
    "cloudflare-dns.com",
    "mozilla.cloudflare-dns.com",
    "one.one.one.one",
    "dns.quad9.net",
    "doh.opendns.com",
    "dns.nextdns.io",
    "doh.cleanbrowsing.org",
];

/// Denies connections that would let an application resolve DNS around
/// the firewall: direct remote port-53 traffic, DNS-over-TLS, and the
/// well-known DNS-over-HTTPS providers.
pub struct DnsBypassCheck {
    doh_domains: HashSet<String>,
}

impl DnsBypassCheck {
    pub fn new() -> Self {
        Self {
            doh_domains: DOH_DOMAINS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl Default for DnsBypassCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl BypassCheckPort for DnsBypassCheck {
    fn check(&self, conn: &Connection) -> (EndpointMatch, EndpointReason) {
        if conn.inbound {
            return (EndpointMatch::NoMatch, EndpointReason::none());
        }

        // DNS queries through the system resolver are handled by the DNS
        // pipeline; only raw IP connections can bypass it.
        if conn.conn_type == ConnectionType::IpConnection {
            if conn.remote_port == DNS_PORT && !conn.entity.ip_scope.is_localhost() {
                return denied("direct dns query to remote server", conn);
            }
            if conn.remote_port == DOT_PORT {
                return denied("dns-over-tls connection", conn);
            }
        }

        let domain = conn.entity.canonical_domain();
        if !domain.is_empty() && self.doh_domains.contains(domain) {
            return denied("disallowed dns-over-https resolver", conn);
        }

        (EndpointMatch::NoMatch, EndpointReason::none())
    }
}

fn denied(reason: &str, conn: &Connection) -> (EndpointMatch, EndpointReason) {
    (
        EndpointMatch::Denied,
        EndpointReason {
            message: reason.to_string(),
            context: Some(json!({
                "domain": conn.entity.canonical_domain(),
                "port": conn.remote_port,
            })),
        },
    )
}
