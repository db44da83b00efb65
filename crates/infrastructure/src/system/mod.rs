mod peer_lookup;

pub use peer_lookup::ProcPeerLookup;
