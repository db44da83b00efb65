use crate::entity::Entity;
use crate::ip_scope::IpScope;
use crate::process::ProcessInfo;
use crate::verdict::{Reason, Verdict};
use serde_json::Value;
use std::net::IpAddr;
use std::sync::Arc;

pub const PROTOCOL_TCP: u8 = 6;
pub const PROTOCOL_UDP: u8 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionType {
    DnsRequest,
    IpConnection,
}

/// First packet of a flow, as delivered by the capture mechanism.
/// DNS queries carry no packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketInfo {
    pub inbound: bool,
    pub version: u8,
    pub protocol: u8,
    pub src: IpAddr,
    pub src_port: u16,
    pub dst: IpAddr,
    pub dst_port: u16,
}

impl PacketInfo {
    pub fn is_outbound(&self) -> bool {
        !self.inbound
    }

    /// The reverse 5-tuple, used to look up the process on the other end
    /// of a local flow.
    pub fn reverse(&self) -> PacketInfo {
        PacketInfo {
            inbound: !self.inbound,
            version: self.version,
            protocol: self.protocol,
            src: self.src,
            src_port: self.src_port,
            dst: self.dst,
            dst_port: self.dst_port,
        }
    }
}

/// DNS server that produced a resolution, with its own address scope.
#[derive(Debug, Clone, Copy)]
pub struct ResolverInfo {
    pub ip: IpAddr,
    pub scope: IpScope,
}

impl ResolverInfo {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            scope: IpScope::classify(ip),
        }
    }
}

/// The unit of decision: one DNS query or one IP flow, tied to its
/// originating process. Created by the packet/DNS ingress, mutated only
/// within a single decision call.
#[derive(Debug, Clone)]
pub struct Connection {
    pub inbound: bool,
    pub conn_type: ConnectionType,
    pub protocol: u8,
    pub local_ip: Option<IpAddr>,
    pub local_port: u16,
    pub remote_port: u16,
    pub entity: Entity,
    pub resolver: Option<ResolverInfo>,
    pub verdict: Verdict,
    pub reason: Reason,
    pub profile_revision_counter: u64,
    pub internal: bool,
    process: Arc<ProcessInfo>,
    save_when_finished: bool,
}

impl Connection {
    pub fn new(conn_type: ConnectionType, entity: Entity, process: Arc<ProcessInfo>) -> Self {
        Self {
            inbound: false,
            conn_type,
            protocol: PROTOCOL_TCP,
            local_ip: None,
            local_port: 0,
            remote_port: 0,
            entity,
            resolver: None,
            verdict: Verdict::Undecided,
            reason: Reason::default(),
            profile_revision_counter: 0,
            internal: false,
            process,
            save_when_finished: false,
        }
    }

    pub fn inbound(mut self) -> Self {
        self.inbound = true;
        self
    }

    pub fn with_protocol(mut self, protocol: u8) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_ports(mut self, local: u16, remote: u16) -> Self {
        self.local_port = local;
        self.remote_port = remote;
        self
    }

    pub fn with_resolver(mut self, resolver: ResolverInfo) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn process(&self) -> &Arc<ProcessInfo> {
        &self.process
    }

    /// Marks the connection dirty so the caller persists it when the
    /// decision call finishes.
    pub fn save_when_finished(&mut self) {
        self.save_when_finished = true;
    }

    pub fn needs_saving(&self) -> bool {
        self.save_when_finished
    }

    pub fn accept(&mut self, reason: impl Into<String>, option_key: &'static str) {
        self.set_verdict(Verdict::Accept, Reason::new(reason, option_key));
    }

    pub fn accept_with_context(
        &mut self,
        reason: impl Into<String>,
        option_key: &'static str,
        context: Value,
    ) {
        self.set_verdict(Verdict::Accept, Reason::with_context(reason, option_key, context));
    }

    pub fn block(&mut self, reason: impl Into<String>, option_key: &'static str) {
        self.set_verdict(Verdict::Block, Reason::new(reason, option_key));
    }

    pub fn block_with_context(
        &mut self,
        reason: impl Into<String>,
        option_key: &'static str,
        context: Value,
    ) {
        self.set_verdict(Verdict::Block, Reason::with_context(reason, option_key, context));
    }

    pub fn drop_conn(&mut self, reason: impl Into<String>, option_key: &'static str) {
        self.set_verdict(Verdict::Drop, Reason::new(reason, option_key));
    }

    pub fn deny(&mut self, reason: impl Into<String>, option_key: &'static str) {
        self.set_verdict(Verdict::Deny, Reason::new(reason, option_key));
    }

    pub fn deny_with_context(
        &mut self,
        reason: impl Into<String>,
        option_key: &'static str,
        context: Value,
    ) {
        self.set_verdict(Verdict::Deny, Reason::with_context(reason, option_key, context));
    }

    fn set_verdict(&mut self, verdict: Verdict, reason: Reason) {
        self.verdict = verdict;
        self.reason = reason;
    }
}

impl std::fmt::Display for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let direction = if self.inbound { "<-" } else { "->" };
        if self.entity.domain.is_empty() {
            match self.entity.ip {
                Some(ip) => write!(f, "{} {} {}:{}", self.process.name, direction, ip, self.remote_port),
                None => write!(f, "{} {} ?", self.process.name, direction),
            }
        } else {
            write!(f, "{} {} {}", self.process.name, direction, self.entity.domain)
        }
    }
}
