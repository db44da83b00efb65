mod bypass;
mod filter_lists;
mod netenv;
mod peer_lookup;
mod prompt;

pub use bypass::BypassCheckPort;
pub use filter_lists::{FilterListMatch, FilterListPort};
pub use netenv::NetEnvPort;
pub use peer_lookup::PeerLookupPort;
pub use prompt::{PromptDecision, PromptPort};
