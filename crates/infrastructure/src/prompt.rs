use async_trait::async_trait;
use ironwall_application::ports::{PromptDecision, PromptPort};
use ironwall_domain::Connection;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// One pending question for the decision UI.
#[derive(Debug)]
pub struct PromptRequest {
    pub process_name: String,
    pub process_path: String,
    pub domain: String,
    pub remote: String,
    pub reply: oneshot::Sender<PromptDecision>,
}

/// Forwards "ask" decisions to an interactive UI over a channel. A full
/// queue, a closed channel, or a timeout all resolve as deny.
pub struct ChannelPrompt {
    sender: mpsc::Sender<PromptRequest>,
    timeout: Duration,
}

impl ChannelPrompt {
    pub fn new(timeout: Duration) -> (Self, mpsc::Receiver<PromptRequest>) {
        let (sender, receiver) = mpsc::channel(64);
        (Self { sender, timeout }, receiver)
    }
}

#[async_trait]
impl PromptPort for ChannelPrompt {
    async fn prompt(&self, conn: &Connection) -> PromptDecision {
        let (reply, response) = oneshot::channel();
        let request = PromptRequest {
            process_name: conn.process().name.clone(),
            process_path: conn.process().path.clone(),
            domain: conn.entity.domain.clone(),
            remote: match conn.entity.ip {
                Some(ip) => format!("{}:{}", ip, conn.remote_port),
                None => String::new(),
            },
            reply,
        };

        if self.sender.try_send(request).is_err() {
            debug!(connection = %conn, "prompt: no UI attached, denying");
            return PromptDecision::Deny;
        }

        match tokio::time::timeout(self.timeout, response).await {
            Ok(Ok(decision)) => decision,
            _ => PromptDecision::Deny,
        }
    }
}
