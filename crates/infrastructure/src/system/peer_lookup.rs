use async_trait::async_trait;
use ironwall_application::ports::PeerLookupPort;
use ironwall_domain::{DomainError, PacketInfo, ProcessInfo, PROTOCOL_TCP, PROTOCOL_UDP};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

/// Resolves the local process owning the other end of a flow by scanning
/// the kernel's socket tables under /proc/net and mapping the socket
/// inode back to a PID. Only meaningful on Linux; elsewhere every lookup
/// answers None.
pub struct ProcPeerLookup {
    proc_root: String,
}

impl ProcPeerLookup {
    pub fn new() -> Self {
        Self {
            proc_root: "/proc".to_string(),
        }
    }

    pub fn with_root(proc_root: impl Into<String>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }
}

impl Default for ProcPeerLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PeerLookupPort for ProcPeerLookup {
    #[cfg(target_os = "linux")]
    async fn lookup_local_peer(
        &self,
        packet: &PacketInfo,
    ) -> Result<Option<Arc<ProcessInfo>>, DomainError> {
        // The local side of the socket we are looking for.
        let (local_ip, local_port) = if packet.inbound {
            (packet.dst, packet.dst_port)
        } else {
            (packet.src, packet.src_port)
        };

        let tables: &[&str] = match (packet.protocol, local_ip) {
            (PROTOCOL_TCP, IpAddr::V4(_)) => &["tcp"],
            (PROTOCOL_TCP, IpAddr::V6(_)) => &["tcp6"],
            (PROTOCOL_UDP, IpAddr::V4(_)) => &["udp"],
            (PROTOCOL_UDP, IpAddr::V6(_)) => &["udp6"],
            _ => return Ok(None),
        };

        for table in tables {
            let path = format!("{}/net/{}", self.proc_root, table);
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| DomainError::PeerLookupFailed(format!("read {path}: {e}")))?;

            if let Some(inode) = find_socket_inode(&content, local_ip, local_port) {
                if let Some(pid) = self.find_pid_by_inode(inode).await? {
                    return Ok(Some(Arc::new(self.process_info(pid).await?)));
                }
            }
        }

        Ok(None)
    }

    #[cfg(not(target_os = "linux"))]
    async fn lookup_local_peer(
        &self,
        _packet: &PacketInfo,
    ) -> Result<Option<Arc<ProcessInfo>>, DomainError> {
        Ok(None)
    }
}

#[cfg(target_os = "linux")]
impl ProcPeerLookup {
    async fn find_pid_by_inode(&self, inode: u64) -> Result<Option<i32>, DomainError> {
        let target = format!("socket:[{inode}]");
        let mut proc_dir = tokio::fs::read_dir(&self.proc_root)
            .await
            .map_err(|e| DomainError::PeerLookupFailed(e.to_string()))?;

        while let Ok(Some(entry)) = proc_dir.next_entry().await {
            let name = entry.file_name();
            let Some(pid) = name.to_str().and_then(|s| s.parse::<i32>().ok()) else {
                continue;
            };

            let fd_dir = format!("{}/{}/fd", self.proc_root, pid);
            let Ok(mut fds) = tokio::fs::read_dir(&fd_dir).await else {
                // Not our process or gone; skip silently.
                continue;
            };
            while let Ok(Some(fd)) = fds.next_entry().await {
                if let Ok(link) = tokio::fs::read_link(fd.path()).await {
                    if link.to_string_lossy() == target {
                        return Ok(Some(pid));
                    }
                }
            }
        }

        debug!(inode, "peer lookup: no process owns socket inode");
        Ok(None)
    }

    async fn process_info(&self, pid: i32) -> Result<ProcessInfo, DomainError> {
        let exe = tokio::fs::read_link(format!("{}/{}/exe", self.proc_root, pid))
            .await
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = tokio::fs::read_to_string(format!("{}/{}/comm", self.proc_root, pid))
            .await
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        Ok(ProcessInfo::new(pid, exe).with_name(name))
    }
}

/// Finds the inode of the socket bound to `ip:port` in a /proc/net socket
/// table. Addresses there are hex-encoded with little-endian 32-bit
/// groups.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn find_socket_inode(table: &str, ip: IpAddr, port: u16) -> Option<u64> {
    for line in table.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 10 {
            continue;
        }

        let Some((addr_hex, port_hex)) = fields[1].split_once(':') else {
            continue;
        };
        let Ok(entry_port) = u16::from_str_radix(port_hex, 16) else {
            continue;
        };
        if entry_port != port {
            continue;
        }

        match parse_proc_addr(addr_hex) {
            Some(entry_ip) if entry_ip == ip || entry_ip.is_unspecified() => {
                return fields[9].parse::<u64>().ok();
            }
            _ => {}
        }
    }
    None
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_proc_addr(hex: &str) -> Option<IpAddr> {
    match hex.len() {
        8 => {
            let raw = u32::from_str_radix(hex, 16).ok()?;
            Some(IpAddr::from(raw.swap_bytes().to_be_bytes()))
        }
        32 => {
            let mut bytes = [0u8; 16];
            for (i, chunk) in bytes.chunks_exact_mut(4).enumerate() {
                let group = u32::from_str_radix(&hex[i * 8..i * 8 + 8], 16).ok()?;
                chunk.copy_from_slice(&group.to_le_bytes());
            }
            Some(IpAddr::from(bytes))
        }
        _ => None,
    }
}
