use crate::entity::Entity;
use ipnetwork::IpNetwork;
use serde_json::json;
use std::net::IpAddr;

/// Outcome of matching an entity against an ordered rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointMatch {
    Denied,
    Permitted,
    NoMatch,
}

/// Why a rule matched, for the verdict reason.
#[derive(Debug, Clone, Default)]
pub struct EndpointReason {
    pub message: String,
    pub context: Option<serde_json::Value>,
}

impl EndpointReason {
    pub fn none() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointPattern {
    /// Matches every entity.
    Any,
    /// Exact domain, or `*.` prefix matching the apex and all subdomains.
    Domain(String),
    Ip(IpAddr),
    Network(IpNetwork),
}

#[derive(Debug, Clone)]
pub struct EndpointRule {
    pub pattern: EndpointPattern,
    pub permit: bool,
}

impl EndpointRule {
    pub fn permit(pattern: EndpointPattern) -> Self {
        Self {
            pattern,
            permit: true,
        }
    }

    pub fn deny(pattern: EndpointPattern) -> Self {
        Self {
            pattern,
            permit: false,
        }
    }

    fn matches(&self, entity: &Entity) -> bool {
        match &self.pattern {
            EndpointPattern::Any => true,
            EndpointPattern::Domain(pattern) => {
                let domain = entity.canonical_domain();
                if domain.is_empty() {
                    return false;
                }
                match_domain_pattern(pattern, domain)
            }
            EndpointPattern::Ip(ip) => entity.ip == Some(*ip),
            EndpointPattern::Network(net) => match entity.ip {
                Some(ip) => net.contains(ip),
                None => false,
            },
        }
    }

    fn describe(&self) -> String {
        let action = if self.permit { "permitted" } else { "denied" };
        match &self.pattern {
            EndpointPattern::Any => format!("{action} by rule matching any endpoint"),
            EndpointPattern::Domain(d) => format!("{action} by rule on domain {d}"),
            EndpointPattern::Ip(ip) => format!("{action} by rule on IP {ip}"),
            EndpointPattern::Network(net) => format!("{action} by rule on network {net}"),
        }
    }
}

fn match_domain_pattern(pattern: &str, domain: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix("*.") {
        return domain.eq_ignore_ascii_case(suffix)
            || domain
                .to_ascii_lowercase()
                .ends_with(&format!(".{}", suffix.to_ascii_lowercase()));
    }
    domain.eq_ignore_ascii_case(pattern)
}

/// Walks the rules in order; the first matching rule wins.
pub fn match_endpoint(rules: &[EndpointRule], entity: &Entity) -> (EndpointMatch, EndpointReason) {
    for (index, rule) in rules.iter().enumerate() {
        if rule.matches(entity) {
            let reason = EndpointReason {
                message: rule.describe(),
                context: Some(json!({
                    "rule_index": index,
                    "permit": rule.permit,
                })),
            };
            let outcome = if rule.permit {
                EndpointMatch::Permitted
            } else {
                EndpointMatch::Denied
            };
            return (outcome, reason);
        }
    }
    (EndpointMatch::NoMatch, EndpointReason::none())
}
