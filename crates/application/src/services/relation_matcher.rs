use ironwall_domain::Connection;

const RELATION_THRESHOLD: f64 = 0.5;
const PREFIX_BONUS_SCALE: f64 = 0.1;
const PREFIX_BONUS_MAX: usize = 4;

/// Tries to find a relation between a process and the domain it contacts,
/// for a better out-of-the-box experience. This is _not_ meant to thwart
/// intentional malware.
///
/// Only the last two path segments of the executable are considered. Each
/// domain label is compared against those segments, then the process name,
/// then the executable name; the first pair scoring above the threshold
/// wins. Very short labels can score spuriously high against short
/// segments; the threshold is kept as-is, a minimum label length is a
/// possible future tuning.
pub fn check_relation(conn: &Connection) -> Option<String> {
    let domain = conn.entity.canonical_domain();
    if domain.is_empty() {
        return None;
    }
    let process = conn.process();
    if !process.is_known() {
        return None;
    }

    let mut path_elements: Vec<&str> = process.path.split('/').filter(|s| !s.is_empty()).collect();
    if path_elements.len() > 2 {
        path_elements.drain(..path_elements.len() - 2);
    }

    for domain_element in domain.split('.') {
        for path_element in &path_elements {
            if similarity(domain_element, path_element) > RELATION_THRESHOLD {
                return Some(relation_reason(domain_element, path_element));
            }
        }
        if similarity(domain_element, &process.name) > RELATION_THRESHOLD {
            return Some(relation_reason(domain_element, &process.name));
        }
        if similarity(domain_element, &process.exec_name) > RELATION_THRESHOLD {
            return Some(relation_reason(domain_element, &process.exec_name));
        }
    }

    None
}

fn relation_reason(domain_element: &str, process_element: &str) -> String {
    format!("auto allowed: domain is related to process: {domain_element} is related to {process_element}")
}

/// Normalized Levenshtein similarity with a common-prefix bonus, so that
/// a label matching the start of a longer executable name (e.g. "google"
/// against "google-chrome") still counts as related.
fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let base = strsim::normalized_levenshtein(a, b);
    let prefix = a
        .chars()
        .zip(b.chars())
        .take(PREFIX_BONUS_MAX)
        .take_while(|(x, y)| x == y)
        .count();
    base + prefix as f64 * PREFIX_BONUS_SCALE * (1.0 - base)
}

#[cfg(test)]
mod tests {
    use super::similarity;

    #[test]
    fn test_prefix_bonus_lifts_shared_stem() {
        assert!(similarity("google", "google-chrome") > 0.5);
        assert!(similarity("spotify", "spotify") > 0.99);
    }

    #[test]
    fn test_unrelated_names_stay_low() {
        assert!(similarity("example", "curl") < 0.5);
        assert!(similarity("com", "firefox") < 0.5);
        assert_eq!(similarity("", "curl"), 0.0);
    }
}
