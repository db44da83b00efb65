use super::module::FilterListModule;
use async_trait::async_trait;
use ironwall_application::ports::{FilterListMatch, FilterListPort};
use ironwall_domain::{DomainError, EndpointMatch, EndpointReason, Entity};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

/// Filter-list lookups against the module's current snapshot. Captures the
/// snapshot pointer once per query, so a decision in progress during an
/// update completes against one consistent view.
pub struct FilterListMatcher {
    module: Arc<FilterListModule>,
}

impl FilterListMatcher {
    pub fn new(module: Arc<FilterListModule>) -> Self {
        Self { module }
    }
}

#[async_trait]
impl FilterListPort for FilterListMatcher {
    async fn entity_categories(&self, entity: &Entity) -> Result<Vec<String>, DomainError> {
        match self.module.snapshot() {
            Some(snapshot) => snapshot.lookup_sources(entity).await,
            None => Ok(Vec::new()),
        }
    }

    async fn match_entity(
        &self,
        entity: &Entity,
        active: &[String],
    ) -> Result<FilterListMatch, DomainError> {
        let categories = self.entity_categories(entity).await?;
        let active: HashSet<&String> = active.iter().collect();
        let matched: Vec<String> = categories
            .into_iter()
            .filter(|id| active.contains(id))
            .collect();

        if matched.is_empty() {
            return Ok(FilterListMatch::no_match());
        }

        let lists = matched.join(", ");
        let context = json!({ "lists": matched.clone() });
        Ok(FilterListMatch {
            result: EndpointMatch::Denied,
            reason: EndpointReason {
                message: format!("matches filter list: {lists}"),
                context: Some(context),
            },
            matched,
        })
    }

    fn is_loaded(&self) -> bool {
        self.module.is_loaded()
    }
}
