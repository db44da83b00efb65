use crate::ports::{
    BypassCheckPort, FilterListPort, NetEnvPort, PeerLookupPort, PromptDecision, PromptPort,
};
use crate::services::check_relation;
use ironwall_domain::{
    dga, option_keys, Connection, ConnectionType, DefaultAction, EndpointMatch, LayeredProfile,
    OnlineStatus, PacketInfo, ProfileSettings, Verdict,
};
use ironwall_domain::endpoint::match_endpoint;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

// Call order:
//
// DNS query:
// 1. DecideOnConnection is called when a DNS query is made, with no packet.
// 2. DecideOnResolvedDns is called to filter out A/AAAA records that a
//    later decision would deny.
//
// Network connection:
// 3. DecideOnConnection is called with the first packet of the flow.

const DGA_SCORE_THRESHOLD: f64 = 5.0;
const TUNNEL_SCORE_THRESHOLD: f64 = 10.0;
// Short second-level domains (CDNs and the like) would trigger LMS checks
// but are too small to exfiltrate data.
const TUNNEL_MIN_SUBDOMAIN_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decider {
    OwnConnection,
    SelfCommunication,
    ConnectionType,
    ConnectionScope,
    EndpointLists,
    ResolverScope,
    ConnectivityDomain,
    BypassPrevention,
    FilterLists,
    DropInbound,
    DomainHeuristics,
    AutoPermitRelated,
}

/// The default pipeline; order is precedence.
const DEFAULT_DECIDERS: &[Decider] = &[
    Decider::OwnConnection,
    Decider::SelfCommunication,
    Decider::ConnectionType,
    Decider::ConnectionScope,
    Decider::EndpointLists,
    Decider::ResolverScope,
    Decider::ConnectivityDomain,
    Decider::BypassPrevention,
    Decider::FilterLists,
    Decider::DropInbound,
    Decider::DomainHeuristics,
    Decider::AutoPermitRelated,
];

/// DNS requests from the system resolver: the original requesting process
/// is not known yet, so only global-only aspects are checked here. The
/// resulting connection is decided in full once the resolved answer is
/// handed to the real requester.
const SYSTEM_RESOLVER_DECIDERS: &[Decider] =
    &[Decider::ConnectivityDomain, Decider::BypassPrevention];

enum PipelineOutcome {
    Concluded,
    Fallthrough(DefaultAction),
    Cancelled,
}

/// Makes the decision about a connection by running the decider pipeline
/// under the connection's layered profile.
pub struct DecideOnConnection {
    filter_lists: Arc<dyn FilterListPort>,
    peer_lookup: Arc<dyn PeerLookupPort>,
    netenv: Arc<dyn NetEnvPort>,
    bypass: Arc<dyn BypassCheckPort>,
    prompt: Arc<dyn PromptPort>,
    own_pid: i32,
}

impl DecideOnConnection {
    pub fn new(
        filter_lists: Arc<dyn FilterListPort>,
        peer_lookup: Arc<dyn PeerLookupPort>,
        netenv: Arc<dyn NetEnvPort>,
        bypass: Arc<dyn BypassCheckPort>,
        prompt: Arc<dyn PromptPort>,
        own_pid: i32,
    ) -> Self {
        Self {
            filter_lists,
            peer_lookup,
            netenv,
            bypass,
            prompt,
            own_pid,
        }
    }

    /// Decides on the connection, leaving the verdict and reason on it.
    /// `pkt` is absent for DNS queries. On cancellation the verdict is
    /// left untouched; the caller drops the connection.
    pub async fn execute(
        &self,
        cancel: &CancellationToken,
        conn: &mut Connection,
        pkt: Option<&PacketInfo>,
    ) {
        let Some(profile) = conn.process().profile().cloned() else {
            conn.deny("unknown process or profile", option_keys::NO_REASON);
            return;
        };

        self.coordinate_revision(conn, &profile).await;

        // DNS requests from the system resolver get the reduced pipeline
        // and fall through to accept.
        if conn.conn_type == ConnectionType::DnsRequest && conn.process().is_system_resolver {
            match self
                .run_deciders(cancel, SYSTEM_RESOLVER_DECIDERS, conn, &profile, pkt)
                .await
            {
                PipelineOutcome::Concluded | PipelineOutcome::Cancelled => {}
                PipelineOutcome::Fallthrough(_) => {
                    conn.accept("allowing system resolver dns request", option_keys::NO_REASON);
                }
            }
            return;
        }

        match self
            .run_deciders(cancel, DEFAULT_DECIDERS, conn, &profile, pkt)
            .await
        {
            PipelineOutcome::Concluded | PipelineOutcome::Cancelled => {}
            PipelineOutcome::Fallthrough(DefaultAction::Permit) => {
                conn.accept("allowed by default action", option_keys::DEFAULT_ACTION);
            }
            PipelineOutcome::Fallthrough(DefaultAction::Ask) => {
                self.prompt_user(cancel, conn).await;
            }
            PipelineOutcome::Fallthrough(_) => {
                conn.deny("blocked by default action", option_keys::DEFAULT_ACTION);
            }
        }
    }

    /// Keeps the connection's cached verdict coherent with its governing
    /// profile: a pending profile update resets the verdict and the
    /// entity's matched lists, a plain counter advance only syncs the
    /// bookkeeping.
    async fn coordinate_revision(&self, conn: &mut Connection, profile: &Arc<LayeredProfile>) {
        if profile.needs_update() {
            conn.profile_revision_counter = profile.update().await;
            conn.save_when_finished();

            info!(connection = %conn, "filter: re-evaluating verdict");
            conn.verdict = Verdict::Undecided;
            conn.entity.reset_lists();
        } else {
            let rev_cnt = profile.revision_cnt();
            if conn.profile_revision_counter != rev_cnt {
                conn.profile_revision_counter = rev_cnt;
                conn.save_when_finished();
            }
        }
    }

    async fn run_deciders(
        &self,
        cancel: &CancellationToken,
        deciders: &[Decider],
        conn: &mut Connection,
        profile: &Arc<LayeredProfile>,
        pkt: Option<&PacketInfo>,
    ) -> PipelineOutcome {
        // Read-lock the profile for the whole run so all deciders observe
        // one consistent configuration.
        let settings = profile.lock_for_usage().await;

        for decider in deciders {
            if cancel.is_cancelled() {
                return PipelineOutcome::Cancelled;
            }
            if self.run_decider(*decider, conn, &settings, pkt).await {
                return PipelineOutcome::Concluded;
            }
        }

        PipelineOutcome::Fallthrough(settings.default_action)
    }

    /// Runs a single decider; returns true iff it set a verdict.
    async fn run_decider(
        &self,
        decider: Decider,
        conn: &mut Connection,
        settings: &ProfileSettings,
        pkt: Option<&PacketInfo>,
    ) -> bool {
        match decider {
            Decider::OwnConnection => self.check_own_connection(conn, pkt),
            Decider::SelfCommunication => self.check_self_communication(conn, pkt).await,
            Decider::ConnectionType => check_connection_type(conn, settings),
            Decider::ConnectionScope => check_connection_scope(conn, settings),
            Decider::EndpointLists => check_endpoint_lists(conn, settings),
            Decider::ResolverScope => check_resolver_scope(conn, settings),
            Decider::ConnectivityDomain => self.check_connectivity_domain(conn, settings),
            Decider::BypassPrevention => self.check_bypass_prevention(conn, settings),
            Decider::FilterLists => self.check_filter_lists(conn, settings).await,
            Decider::DropInbound => drop_inbound(conn),
            Decider::DomainHeuristics => check_domain_heuristics(conn, settings),
            Decider::AutoPermitRelated => check_auto_permit_related(conn, settings),
        }
    }

    /// Grants all connections that originate from the firewall itself.
    fn check_own_connection(&self, conn: &mut Connection, pkt: Option<&PacketInfo>) -> bool {
        if conn.process().pid == self.own_pid && pkt.map_or(true, |p| p.is_outbound()) {
            info!(connection = %conn, "filter: granting own connection");
            conn.accept("connection by Ironwall", option_keys::NO_REASON);
            conn.internal = true;
            return true;
        }

        false
    }

    /// Checks if the process is communicating with itself.
    async fn check_self_communication(
        &self,
        conn: &mut Connection,
        pkt: Option<&PacketInfo>,
    ) -> bool {
        let Some(pkt) = pkt else {
            return false;
        };
        if conn.process().pid < 0 || pkt.src != pkt.dst {
            return false;
        }

        // We want to know the process on the other end.
        match self.peer_lookup.lookup_local_peer(&pkt.reverse()).await {
            Err(e) => {
                warn!(error = %e, "filter: failed to find local peer process");
            }
            Ok(None) => {}
            Ok(Some(peer)) => {
                if peer.path == conn.process().path {
                    conn.accept("process internal connection", option_keys::NO_REASON);
                    conn.internal = true;
                    return true;
                }
            }
        }

        false
    }

    fn check_connectivity_domain(&self, conn: &mut Connection, settings: &ProfileSettings) -> bool {
        // The special grant only applies to outgoing connections with a
        // domain, while the network is still in bootstrap (captive portal
        // or worse), and only if the app may reach the Internet at all.
        if conn.entity.domain.is_empty()
            || self.netenv.online_status() > OnlineStatus::Portal
            || conn.inbound
            || settings.block_scope_internet
        {
            return false;
        }

        if self
            .netenv
            .is_connectivity_domain(conn.entity.canonical_domain())
        {
            conn.accept(
                "special grant for connectivity domain during network bootstrap",
                option_keys::NO_REASON,
            );
            return true;
        }

        false
    }

    fn check_bypass_prevention(&self, conn: &mut Connection, settings: &ProfileSettings) -> bool {
        if !settings.prevent_bypassing {
            return false;
        }

        let (result, reason) = self.bypass.check(conn);
        let context = reason.context.unwrap_or(serde_json::Value::Null);
        match result {
            EndpointMatch::Denied => {
                conn.block_with_context(
                    format!("bypass prevention: {}", reason.message),
                    option_keys::PREVENT_BYPASSING,
                    context,
                );
                true
            }
            EndpointMatch::Permitted => {
                conn.accept_with_context(
                    format!("bypass prevention: {}", reason.message),
                    option_keys::PREVENT_BYPASSING,
                    context,
                );
                true
            }
            EndpointMatch::NoMatch => false,
        }
    }

    /// Applies the privacy filter lists activated by the profile.
    async fn check_filter_lists(&self, conn: &mut Connection, settings: &ProfileSettings) -> bool {
        if !self.filter_lists.is_loaded() {
            return false;
        }

        if conn.entity.matched_lists().is_none() {
            match self.filter_lists.entity_categories(&conn.entity).await {
                Ok(categories) => conn.entity.set_matched_lists(categories),
                Err(e) => {
                    warn!(error = %e, connection = %conn, "filter: filter list lookup failed");
                    return false;
                }
            }
        }

        let matched: Vec<String> = conn
            .entity
            .matched_lists()
            .unwrap_or_default()
            .iter()
            .filter(|id| settings.filter_lists.contains(*id))
            .cloned()
            .collect();
        if matched.is_empty() {
            return false;
        }

        let lists = matched.join(", ");
        conn.deny_with_context(
            format!("matches filter list: {lists}"),
            option_keys::FILTER_LISTS,
            json!({ "lists": matched }),
        );
        true
    }

    async fn prompt_user(&self, cancel: &CancellationToken, conn: &mut Connection) {
        let decision = tokio::select! {
            _ = cancel.cancelled() => PromptDecision::Deny,
            decision = self.prompt.prompt(conn) => decision,
        };

        match decision {
            PromptDecision::Permit => conn.accept("permitted by user", option_keys::DEFAULT_ACTION),
            PromptDecision::Deny => conn.deny("denied by user", option_keys::DEFAULT_ACTION),
        }
    }
}

fn check_connection_type(conn: &mut Connection, settings: &ProfileSettings) -> bool {
    if conn.conn_type != ConnectionType::IpConnection {
        return false;
    }

    // BlockInbound does not apply to the Localhost scope.
    if conn.inbound && !conn.entity.ip_scope.is_localhost() && settings.block_inbound {
        conn.drop_conn("inbound connections blocked", option_keys::BLOCK_INBOUND);
        return true;
    }

    // BlockP2P only applies to the Global scope.
    if conn.entity.ip_scope.is_global() && conn.entity.domain.is_empty() && settings.block_p2p {
        conn.block("direct connections (P2P) blocked", option_keys::BLOCK_P2P);
        return true;
    }

    false
}

fn check_connection_scope(conn: &mut Connection, settings: &ProfileSettings) -> bool {
    // DNS is expected to resolve to LAN or Internet addresses; localhost
    // queries are answered by the nameserver directly. A request can be
    // blocked right away only when both scopes are off-limits.
    if conn.conn_type == ConnectionType::DnsRequest {
        if settings.block_scope_internet && settings.block_scope_lan {
            conn.block(
                "Internet and LAN access blocked",
                option_keys::BLOCK_SCOPE_INTERNET,
            );
            return true;
        }
        return false;
    }

    use ironwall_domain::IpScope::*;
    match conn.entity.ip_scope {
        Global | GlobalMulticast => {
            if settings.block_scope_internet {
                conn.deny("Internet access blocked", option_keys::BLOCK_SCOPE_INTERNET);
                return true;
            }
        }
        SiteLocal | LinkLocal | LocalMulticast => {
            if settings.block_scope_lan {
                conn.block("LAN access blocked", option_keys::BLOCK_SCOPE_LAN);
                return true;
            }
        }
        HostLocal => {
            if settings.block_scope_local {
                conn.block("Localhost access blocked", option_keys::BLOCK_SCOPE_LOCAL);
                return true;
            }
        }
        Unknown | Invalid => {
            conn.deny("invalid IP", option_keys::NO_REASON);
            return true;
        }
    }

    false
}

fn check_endpoint_lists(conn: &mut Connection, settings: &ProfileSettings) -> bool {
    let (rules, option_key) = if conn.inbound {
        (&settings.service_endpoints, option_keys::SERVICE_ENDPOINTS)
    } else {
        (&settings.endpoints, option_keys::ENDPOINTS)
    };

    let (result, reason) = match_endpoint(rules, &conn.entity);
    let context = reason.context.unwrap_or(serde_json::Value::Null);
    match result {
        EndpointMatch::Denied => {
            conn.deny_with_context(reason.message, option_key, context);
            true
        }
        EndpointMatch::Permitted => {
            conn.accept_with_context(reason.message, option_key, context);
            true
        }
        EndpointMatch::NoMatch => false,
    }
}

/// A resolver must not answer with addresses of strictly more local scope
/// than its own.
fn check_resolver_scope(conn: &mut Connection, settings: &ProfileSettings) -> bool {
    if conn.conn_type != ConnectionType::IpConnection || !settings.remove_out_of_scope_dns {
        return false;
    }
    let Some(resolver) = conn.resolver else {
        // The address of this connection was not resolved.
        return false;
    };

    if resolver.scope.is_global()
        && (conn.entity.ip_scope.is_lan() || conn.entity.ip_scope.is_localhost())
    {
        conn.block(
            "DNS server horizon violation: global DNS server returned local IP address",
            option_keys::REMOVE_OUT_OF_SCOPE_DNS,
        );
        return true;
    }
    if resolver.scope.is_lan() && conn.entity.ip_scope.is_localhost() {
        conn.block(
            "DNS server horizon violation: LAN DNS server returned localhost IP address",
            option_keys::REMOVE_OUT_OF_SCOPE_DNS,
        );
        return true;
    }

    false
}

/// Implicit default-block for inbound connections.
fn drop_inbound(conn: &mut Connection) -> bool {
    if conn.inbound {
        conn.drop_conn(
            "incoming connection blocked by default",
            option_keys::SERVICE_ENDPOINTS,
        );
        return true;
    }
    false
}

fn check_domain_heuristics(conn: &mut Connection, settings: &ProfileSettings) -> bool {
    if !settings.domain_heuristics || conn.entity.domain.is_empty() {
        return false;
    }

    let trimmed = conn.entity.canonical_domain();
    let Some(etld1) = psl::domain_str(trimmed) else {
        // A malformed domain name is left for checks better suited to
        // reject it.
        warn!(domain = %trimmed, "filter: failed to get eTLD+1");
        return false;
    };

    let label = etld1.split('.').next().unwrap_or_default();
    let score = dga::lms_score(label);
    if score < DGA_SCORE_THRESHOLD {
        debug!(
            connection = %conn,
            etld1 = %etld1,
            score,
            "filter: possible DGA domain",
        );
        conn.block(
            "possible DGA domain commonly used by malware",
            option_keys::DOMAIN_HEURISTICS,
        );
        return true;
    }
    trace!(etld1 = %etld1, score, "filter: LMS score of eTLD+1");

    if trimmed.len() > etld1.len() + TUNNEL_MIN_SUBDOMAIN_LEN {
        let prefix = &trimmed[..trimmed.len() - etld1.len()];
        let score = dga::lms_score_of_domain(prefix);
        if score < TUNNEL_SCORE_THRESHOLD {
            debug!(
                connection = %conn,
                domain = %conn.entity.domain,
                score,
                "filter: possible data tunnel",
            );
            conn.block(
                "possible data tunnel for covert communication and protection bypassing",
                option_keys::DOMAIN_HEURISTICS,
            );
            return true;
        }
        trace!(score, "filter: LMS score of entire domain");
    }

    false
}

fn check_auto_permit_related(conn: &mut Connection, settings: &ProfileSettings) -> bool {
    // Auto permit is pointless when everything is permitted anyway.
    if settings.default_action == DefaultAction::Permit || settings.disable_auto_permit {
        return false;
    }

    if let Some(reason) = check_relation(conn) {
        conn.accept(reason, option_keys::DISABLE_AUTO_PERMIT);
        return true;
    }

    false
}
