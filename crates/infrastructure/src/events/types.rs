use ironwall_domain::OnlineStatus;

/// Operational events the filter-list subsystem reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirewallEvent {
    /// Blocklist artifacts were refreshed by the update subsystem.
    ResourceUpdated { resource: String },
    /// The network environment changed connectivity state.
    OnlineStatusChanged { status: OnlineStatus },
}

/// User-visible module warning. `resolved` marks a previously posted
/// warning as cleared.
#[derive(Debug, Clone)]
pub struct WarningEvent {
    pub code: &'static str,
    pub title: String,
    pub message: String,
    pub resolved: bool,
}

impl WarningEvent {
    pub fn post(code: &'static str, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            title: title.into(),
            message: message.into(),
            resolved: false,
        }
    }

    pub fn resolve(code: &'static str) -> Self {
        Self {
            code,
            title: String::new(),
            message: String::new(),
            resolved: true,
        }
    }
}
