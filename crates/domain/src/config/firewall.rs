use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FirewallConfig {
    /// Default action for applications without a profile-level setting:
    /// "permit", "ask" or "block".
    #[serde(default = "default_action")]
    pub default_action: String,

    /// Apply domain-shape heuristics (DGA and tunnel detection) unless a
    /// profile overrides it.
    #[serde(default)]
    pub domain_heuristics: bool,

    /// Minimum seconds between filter-list update attempts triggered by
    /// operational events.
    #[serde(default = "default_update_debounce_secs")]
    pub filterlist_update_debounce_secs: u64,

    /// Seconds to wait for a user response before an "ask" prompt resolves
    /// as deny.
    #[serde(default = "default_prompt_timeout_secs")]
    pub prompt_timeout_secs: u64,
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            default_action: default_action(),
            domain_heuristics: false,
            filterlist_update_debounce_secs: default_update_debounce_secs(),
            prompt_timeout_secs: default_prompt_timeout_secs(),
        }
    }
}

fn default_action() -> String {
    "ask".to_string()
}

fn default_update_debounce_secs() -> u64 {
    60
}

fn default_prompt_timeout_secs() -> u64 {
    60
}
