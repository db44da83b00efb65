use ironwall_application::services::check_relation;
use ironwall_domain::{Connection, ConnectionType, Entity, ProcessInfo};
use std::sync::Arc;

fn conn(domain: &str, pid: i32, path: &str) -> Connection {
    Connection::new(
        ConnectionType::DnsRequest,
        Entity::from_domain(domain),
        Arc::new(ProcessInfo::new(pid, path)),
    )
}

#[test]
fn test_related_by_executable_name() {
    let reason = check_relation(&conn(
        "mail.google.com",
        4242,
        "/opt/google/chrome/google-chrome",
    ));
    assert_eq!(
        reason.unwrap(),
        "auto allowed: domain is related to process: google is related to google-chrome"
    );
}

#[test]
fn test_related_by_path_segment() {
    let reason = check_relation(&conn("spotify.com", 4242, "/usr/share/spotify/spotify"));
    assert!(reason.unwrap().contains("spotify is related to spotify"));
}

#[test]
fn test_unrelated_process() {
    assert!(check_relation(&conn("mail.google.com", 4242, "/usr/bin/curl")).is_none());
}

#[test]
fn test_empty_domain_never_related() {
    assert!(check_relation(&conn("", 4242, "/usr/bin/curl")).is_none());
}

#[test]
fn test_unknown_process_never_related() {
    assert!(check_relation(&conn("curl.example.com", -1, "/usr/bin/curl")).is_none());
}

#[test]
fn test_domain_without_dots_still_checked() {
    let reason = check_relation(&conn("spotify", 4242, "/usr/share/spotify/spotify"));
    assert!(reason.is_some());
}
