use super::bloom::ListBloom;
use super::keys::entity_keys;
use super::store::{FilterListStore, SourceMeta};
use ironwall_domain::{DomainError, Entity};
use std::collections::HashMap;
use tracing::{debug, info};

/// Immutable view of the filter-list cache: one bloom filter per source,
/// the manifest it was built from, and the store handle for exact lookups.
/// Swapped atomically on update; readers hold one snapshot for the whole
/// decision.
pub struct FilterListSnapshot {
    blooms: HashMap<String, ListBloom>,
    manifest: HashMap<String, SourceMeta>,
    store: FilterListStore,
}

impl FilterListSnapshot {
    /// Builds the snapshot from the cache database. Fails if the store is
    /// unreadable or holds no sources.
    pub async fn compile(store: &FilterListStore) -> Result<Self, DomainError> {
        let sources = store.load_sources().await?;
        if sources.is_empty() {
            return Err(DomainError::ManifestError(
                "cache database holds no filter list sources".to_string(),
            ));
        }

        let mut blooms = HashMap::with_capacity(sources.len());
        let mut manifest = HashMap::with_capacity(sources.len());
        let mut total_entries = 0usize;

        for meta in sources {
            let keys = store.entry_keys(&meta.id).await?;
            let mut bloom =
                ListBloom::with_params(meta.bloom_capacity as usize, meta.bloom_fp_rate);
            for key in &keys {
                bloom.insert(key.as_str());
            }
            total_entries += keys.len();
            debug!(source = %meta.id, entries = keys.len(), "filterlists: compiled source");
            blooms.insert(meta.id.clone(), bloom);
            manifest.insert(meta.id.clone(), meta);
        }

        info!(
            sources = manifest.len(),
            entries = total_entries,
            "filterlists: snapshot compiled"
        );

        Ok(Self {
            blooms,
            manifest,
            store: store.clone(),
        })
    }

    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.manifest.keys().map(|s| s.as_str())
    }

    pub fn manifest(&self) -> &HashMap<String, SourceMeta> {
        &self.manifest
    }

    /// All sources the entity intersects. Every key probes the source's
    /// bloom first; only positives touch the exact store, so the common
    /// negative case stays off disk.
    pub async fn lookup_sources(&self, entity: &Entity) -> Result<Vec<String>, DomainError> {
        let keys = entity_keys(entity);
        let mut matched = Vec::new();

        for (source_id, bloom) in &self.blooms {
            for key in &keys {
                if !bloom.check(key.as_str()) {
                    continue;
                }
                if self.store.contains(source_id, key).await? {
                    matched.push(source_id.clone());
                    break;
                }
            }
        }

        matched.sort_unstable();
        Ok(matched)
    }
}
