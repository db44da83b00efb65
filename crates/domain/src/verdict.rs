use serde_json::Value;

/// Profile option identifiers used as reason option keys on verdicts.
pub mod option_keys {
    pub const NO_REASON: &str = "";
    pub const DEFAULT_ACTION: &str = "default-action";
    pub const ENDPOINTS: &str = "endpoints";
    pub const SERVICE_ENDPOINTS: &str = "service-endpoints";
    pub const BLOCK_INBOUND: &str = "block-inbound";
    pub const BLOCK_P2P: &str = "block-p2p";
    pub const BLOCK_SCOPE_INTERNET: &str = "block-scope-internet";
    pub const BLOCK_SCOPE_LAN: &str = "block-scope-lan";
    pub const BLOCK_SCOPE_LOCAL: &str = "block-scope-local";
    pub const PREVENT_BYPASSING: &str = "prevent-bypassing";
    pub const FILTER_LISTS: &str = "filter-lists";
    pub const DOMAIN_HEURISTICS: &str = "domain-heuristics";
    pub const DISABLE_AUTO_PERMIT: &str = "disable-auto-permit";
    pub const REMOVE_OUT_OF_SCOPE_DNS: &str = "remove-out-of-scope-dns";
}

/// Terminal state of a connection decision.
///
/// `Undecided` is the initial state; a profile update resets a connection
/// back to it before re-running the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verdict {
    #[default]
    Undecided,
    Undeterminable,
    Accept,
    Block,
    Drop,
    Deny,
}

impl Verdict {
    pub fn is_decided(self) -> bool {
        !matches!(self, Verdict::Undecided)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Verdict::Undecided => "undecided",
            Verdict::Undeterminable => "undeterminable",
            Verdict::Accept => "accept",
            Verdict::Block => "block",
            Verdict::Drop => "drop",
            Verdict::Deny => "deny",
        };
        f.write_str(s)
    }
}

/// Machine-readable reason attached to a verdict: a human string, the
/// profile option that caused it, and an optional structured context.
#[derive(Debug, Clone, Default)]
pub struct Reason {
    pub message: String,
    pub option_key: &'static str,
    pub context: Option<Value>,
}

impl Reason {
    pub fn new(message: impl Into<String>, option_key: &'static str) -> Self {
        Self {
            message: message.into(),
            option_key,
            context: None,
        }
    }

    pub fn with_context(
        message: impl Into<String>,
        option_key: &'static str,
        context: Value,
    ) -> Self {
        Self {
            message: message.into(),
            option_key,
            context: Some(context),
        }
    }
}
