use async_trait::async_trait;
use ironwall_domain::{DomainError, EndpointMatch, EndpointReason, Entity};

/// Outcome of matching an entity against the active filter-list sources.
#[derive(Debug, Clone)]
pub struct FilterListMatch {
    pub result: EndpointMatch,
    pub reason: EndpointReason,
    /// Source IDs the entity intersected, restricted to the active set.
    pub matched: Vec<String>,
}

impl FilterListMatch {
    pub fn no_match() -> Self {
        Self {
            result: EndpointMatch::NoMatch,
            reason: EndpointReason::none(),
            matched: Vec::new(),
        }
    }
}

/// Lookup interface of the filter-list cache.
///
/// A matcher that is not loaded answers NoMatch for every query; the rest
/// of the pipeline and the profile default action still apply.
#[async_trait]
pub trait FilterListPort: Send + Sync {
    /// All filter-list sources the entity intersects, regardless of
    /// profile activation. Used to lazily populate the entity.
    async fn entity_categories(&self, entity: &Entity) -> Result<Vec<String>, DomainError>;

    /// Matches the entity against the given active sources.
    async fn match_entity(
        &self,
        entity: &Entity,
        active: &[String],
    ) -> Result<FilterListMatch, DomainError>;

    fn is_loaded(&self) -> bool;
}
