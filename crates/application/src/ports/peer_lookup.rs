use async_trait::async_trait;
use ironwall_domain::{DomainError, PacketInfo, ProcessInfo};
use std::sync::Arc;

/// Resolves the local process on the other end of a flow by its 5-tuple.
/// Used to detect processes communicating with themselves.
#[async_trait]
pub trait PeerLookupPort: Send + Sync {
    async fn lookup_local_peer(
        &self,
        packet: &PacketInfo,
    ) -> Result<Option<Arc<ProcessInfo>>, DomainError>;
}
