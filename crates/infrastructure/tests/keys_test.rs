use ironwall_domain::Entity;
use ironwall_infrastructure::filterlists::{domain_keys, entity_keys};

#[test]
fn test_domain_expands_to_parents() {
    assert_eq!(
        domain_keys("ads.Example.COM."),
        vec![
            "domain:ads.example.com".to_string(),
            "domain:example.com".to_string(),
            "domain:com".to_string(),
        ]
    );
}

#[test]
fn test_single_label_domain() {
    assert_eq!(domain_keys("localhost"), vec!["domain:localhost".to_string()]);
}

#[test]
fn test_entity_keys_cover_all_attributes() {
    let entity = Entity::from_ip("203.0.113.5".parse().unwrap())
        .with_domain("ads.example.com")
        .with_asn(64500)
        .with_country("de");

    let keys = entity_keys(&entity);
    assert!(keys.contains(&"domain:ads.example.com".to_string()));
    assert!(keys.contains(&"domain:example.com".to_string()));
    assert!(keys.contains(&"ip:203.0.113.5".to_string()));
    assert!(keys.contains(&"asn:64500".to_string()));
    assert!(keys.contains(&"country:DE".to_string()));
}

#[test]
fn test_bare_ip_entity() {
    let entity = Entity::from_ip("2001:db8::7".parse().unwrap());
    assert_eq!(entity_keys(&entity), vec!["ip:2001:db8::7".to_string()]);
}
