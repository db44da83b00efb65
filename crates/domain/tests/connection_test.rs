use ironwall_domain::{
    option_keys, Connection, ConnectionType, Entity, PacketInfo, ProcessInfo, Verdict,
    PROTOCOL_TCP,
};
use serde_json::json;
use std::sync::Arc;

fn process() -> Arc<ProcessInfo> {
    Arc::new(ProcessInfo::new(1234, "/usr/bin/curl"))
}

#[test]
fn test_new_connection_is_undecided() {
    let conn = Connection::new(
        ConnectionType::IpConnection,
        Entity::from_ip("8.8.8.8".parse().unwrap()),
        process(),
    );
    assert_eq!(conn.verdict, Verdict::Undecided);
    assert!(!conn.verdict.is_decided());
    assert!(!conn.internal);
    assert!(!conn.needs_saving());
}

#[test]
fn test_verdict_setters() {
    let mut conn = Connection::new(
        ConnectionType::IpConnection,
        Entity::from_domain("example.com"),
        process(),
    );

    conn.accept("allowed by default action", option_keys::DEFAULT_ACTION);
    assert_eq!(conn.verdict, Verdict::Accept);
    assert_eq!(conn.reason.message, "allowed by default action");
    assert_eq!(conn.reason.option_key, option_keys::DEFAULT_ACTION);

    conn.drop_conn("inbound connections blocked", option_keys::BLOCK_INBOUND);
    assert_eq!(conn.verdict, Verdict::Drop);

    conn.deny_with_context(
        "matches filter list: ads",
        option_keys::FILTER_LISTS,
        json!({"lists": ["ads"]}),
    );
    assert_eq!(conn.verdict, Verdict::Deny);
    assert_eq!(conn.reason.context.as_ref().unwrap()["lists"][0], "ads");
}

#[test]
fn test_process_exec_name_derived_from_path() {
    let process = ProcessInfo::new(77, "/opt/google/chrome/google-chrome");
    assert_eq!(process.exec_name, "google-chrome");
    assert_eq!(process.name, "google-chrome");
    assert!(process.is_known());

    let unknown = ProcessInfo::new(-1, "");
    assert!(!unknown.is_known());
}

#[test]
fn test_packet_reverse_swaps_direction_only() {
    let pkt = PacketInfo {
        inbound: false,
        version: 4,
        protocol: PROTOCOL_TCP,
        src: "127.0.0.1".parse().unwrap(),
        src_port: 40000,
        dst: "127.0.0.1".parse().unwrap(),
        dst_port: 8080,
    };
    let rev = pkt.reverse();
    assert!(rev.inbound);
    assert_eq!(rev.src, pkt.src);
    assert_eq!(rev.dst_port, pkt.dst_port);
}

#[test]
fn test_entity_reset_lists() {
    let mut entity = Entity::from_domain("tracker.example");
    assert!(entity.matched_lists().is_none());
    entity.set_matched_lists(vec!["ads".to_string()]);
    assert_eq!(entity.matched_lists().unwrap(), ["ads".to_string()]);
    entity.reset_lists();
    assert!(entity.matched_lists().is_none());
}
