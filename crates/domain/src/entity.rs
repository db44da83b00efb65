use crate::ip_scope::IpScope;
use std::net::IpAddr;

/// The remote side of a connection: a canonical domain (possibly empty for
/// direct IP connections), the resolved address with its scope, and routing
/// metadata. Matched filter-list sources are populated lazily by the
/// filter-list matcher and reset whenever the governing profile changes.
#[derive(Debug, Clone)]
pub struct Entity {
    pub domain: String,
    pub ip: Option<IpAddr>,
    pub ip_scope: IpScope,
    pub asn: Option<u32>,
    pub country: Option<String>,
    matched_lists: Option<Vec<String>>,
}

impl Entity {
    pub fn from_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ip: None,
            ip_scope: IpScope::Unknown,
            asn: None,
            country: None,
            matched_lists: None,
        }
    }

    pub fn from_ip(ip: IpAddr) -> Self {
        Self {
            domain: String::new(),
            ip: Some(ip),
            ip_scope: IpScope::classify(ip),
            asn: None,
            country: None,
            matched_lists: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_asn(mut self, asn: u32) -> Self {
        self.asn = Some(asn);
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Domain with the trailing dot trimmed, as used for matching.
    pub fn canonical_domain(&self) -> &str {
        self.domain.trim_end_matches('.')
    }

    pub fn matched_lists(&self) -> Option<&[String]> {
        self.matched_lists.as_deref()
    }

    pub fn set_matched_lists(&mut self, lists: Vec<String>) {
        self.matched_lists = Some(lists);
    }

    /// Clears the lazily matched filter-list sources.
    pub fn reset_lists(&mut self) {
        self.matched_lists = None;
    }
}
