//! Resource provider seam
//!
//! The controller depends on this boundary instead of performing
//! catalog lookup itself: a deployment may answer resource requests
//! from an in-memory catalog, a bundled asset store, or a network
//! service. [`CatalogProvider`] is the in-memory strategy built on the
//! resolver.

use crate::catalog::{LocaleCatalog, ResourceBundle};
use crate::error::LocalizeResult;
use crate::resolver;
use async_trait::async_trait;

/// A successfully resolved language and its resource bundle
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedResources {
    pub language: String,
    pub resources: ResourceBundle,
}

/// Asynchronous source of resource bundles for a component family
///
/// `Ok(None)` means no candidate matched any available language. The
/// controller treats that as a host configuration error and stays
/// unready; it is distinct from `Err`, which reports a failed fetch.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    async fn get_resources(
        &self,
        candidates: &[String],
    ) -> LocalizeResult<Option<ResolvedResources>>;
}

/// In-memory provider answering from a [`LocaleCatalog`]
#[derive(Debug, Clone)]
pub struct CatalogProvider {
    catalog: LocaleCatalog,
}

impl CatalogProvider {
    pub fn new(catalog: LocaleCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &LocaleCatalog {
        &self.catalog
    }
}

#[async_trait]
impl ResourceProvider for CatalogProvider {
    async fn get_resources(
        &self,
        candidates: &[String],
    ) -> LocalizeResult<Option<ResolvedResources>> {
        Ok(resolver::resolve(candidates, &self.catalog).map(|language| {
            let resources = self
                .catalog
                .bundle(&language)
                .cloned()
                .unwrap_or_default();
            ResolvedResources {
                language,
                resources,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::candidate_languages;

    fn catalog() -> LocaleCatalog {
        LocaleCatalog::from_json_str(
            r#"{"en": {"greeting": "Hello, {0}!"}, "fr": {"greeting": "Bonjour, {0}!"}}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_catalog_provider_resolves_first_candidate() {
        let provider = CatalogProvider::new(catalog());
        let candidates = candidate_languages(Some("fr-CA"), None);
        let resolved = provider.get_resources(&candidates).await.unwrap().unwrap();
        assert_eq!(resolved.language, "fr");
        assert_eq!(resolved.resources["greeting"], "Bonjour, {0}!");
    }

    #[tokio::test]
    async fn test_catalog_provider_no_match_is_none() {
        let provider = CatalogProvider::new(LocaleCatalog::new());
        let candidates = candidate_languages(Some("fr"), None);
        assert_eq!(provider.get_resources(&candidates).await.unwrap(), None);
    }
}
