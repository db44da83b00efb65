use ironwall_domain::Entity;

/// Keys a filter-list entry can be stored under. Domains expand to every
/// parent domain so a list entry for `example.com` also catches
/// `ads.example.com`.
pub fn entity_keys(entity: &Entity) -> Vec<String> {
    let mut keys = Vec::new();

    let domain = entity.canonical_domain();
    if !domain.is_empty() {
        keys.extend(domain_keys(domain));
    }
    if let Some(ip) = entity.ip {
        keys.push(format!("ip:{ip}"));
    }
    if let Some(asn) = entity.asn {
        keys.push(format!("asn:{asn}"));
    }
    if let Some(country) = &entity.country {
        keys.push(format!("country:{}", country.to_ascii_uppercase()));
    }

    keys
}

pub fn domain_keys(domain: &str) -> Vec<String> {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    let mut keys = Vec::new();
    let mut rest = domain.as_str();
    loop {
        keys.push(format!("domain:{rest}"));
        match rest.split_once('.') {
            Some((_, parent)) if !parent.is_empty() => rest = parent,
            _ => break,
        }
    }
    keys
}

pub fn domain_key(domain: &str) -> String {
    format!("domain:{}", domain.trim_end_matches('.').to_ascii_lowercase())
}
