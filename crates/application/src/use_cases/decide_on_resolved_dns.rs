use crate::ports::FilterListPort;
use ironwall_domain::{
    endpoint::match_endpoint, Connection, EndpointMatch, Entity, ProfileSettings,
};
use std::net::IpAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Strips A/AAAA records from a DNS response that a subsequent decision
/// on the resulting IP connection would deny, so blocked addresses never
/// reach the application.
pub struct DecideOnResolvedDns {
    filter_lists: Arc<dyn FilterListPort>,
}

impl DecideOnResolvedDns {
    pub fn new(filter_lists: Arc<dyn FilterListPort>) -> Self {
        Self { filter_lists }
    }

    /// Returns the answers that survive the outgoing endpoint rules and
    /// the active filter lists. Lookup failures keep the answer; the full
    /// pipeline decides once the connection is attempted.
    pub async fn execute(
        &self,
        cancel: &CancellationToken,
        conn: &Connection,
        answers: &[IpAddr],
    ) -> Vec<IpAddr> {
        let Some(profile) = conn.process().profile().cloned() else {
            return Vec::new();
        };
        let settings = profile.lock_for_usage().await;

        let mut filtered = Vec::with_capacity(answers.len());
        for &ip in answers {
            if cancel.is_cancelled() {
                break;
            }
            if self.permits(conn, &settings, ip).await {
                filtered.push(ip);
            }
        }
        filtered
    }

    async fn permits(&self, conn: &Connection, settings: &ProfileSettings, ip: IpAddr) -> bool {
        let candidate = Entity::from_ip(ip).with_domain(conn.entity.domain.clone());

        let (result, _) = match_endpoint(&settings.endpoints, &candidate);
        match result {
            EndpointMatch::Denied => {
                debug!(ip = %ip, connection = %conn, "filter: dropping denied dns answer");
                return false;
            }
            EndpointMatch::Permitted => return true,
            EndpointMatch::NoMatch => {}
        }

        if !self.filter_lists.is_loaded() {
            return true;
        }
        match self
            .filter_lists
            .match_entity(&candidate, &settings.filter_lists)
            .await
        {
            Ok(list_match) => {
                if list_match.result == EndpointMatch::Denied {
                    debug!(ip = %ip, connection = %conn, "filter: dropping filtered dns answer");
                    return false;
                }
                true
            }
            Err(e) => {
                warn!(error = %e, ip = %ip, "filter: filter list lookup failed for dns answer");
                true
            }
        }
    }
}
