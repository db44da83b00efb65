mod bloom;
mod keys;
mod matcher;
mod module;
mod snapshot;
mod store;

pub use bloom::ListBloom;
pub use keys::{domain_key, domain_keys, entity_keys};
pub use matcher::FilterListMatcher;
pub use module::{
    FilterListModule, WARN_DISABLED, WARN_STALE_DATA, WARN_UPDATE_FAILED, WARN_UPDATE_IN_PROGRESS,
};
pub use snapshot::FilterListSnapshot;
pub use store::{FilterListStore, SourceMeta};
