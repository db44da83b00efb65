mod decide_on_connection;
mod decide_on_resolved_dns;

pub use decide_on_connection::DecideOnConnection;
pub use decide_on_resolved_dns::DecideOnResolvedDns;
