use async_trait::async_trait;
use ironwall_domain::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptDecision {
    Permit,
    Deny,
}

/// Interactive decision UI. `prompt` suspends the connection until the
/// user answers; implementations resolve as Deny on timeout.
#[async_trait]
pub trait PromptPort: Send + Sync {
    async fn prompt(&self, conn: &Connection) -> PromptDecision;
}
