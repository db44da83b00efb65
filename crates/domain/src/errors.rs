use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Filter lists are not loaded")]
    FilterListsNotLoaded,

    #[error("Filter list compile error: {0}")]
    FilterListCompileError(String),

    #[error("Filter list manifest error: {0}")]
    ManifestError(String),

    #[error("Peer process lookup failed: {0}")]
    PeerLookupFailed(String),

    #[error("Process not found: {0}")]
    ProcessNotFound(i32),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Operation cancelled")]
    Cancelled,
}
