//! Trait definition for the catalogue API client.
//!
//! The service directory and the resolver only talk to the catalogue through
//! [`CatalogueApi`], so tests can substitute a mock for the HTTP client.

use async_trait::async_trait;

use super::adapter::ResolvedLink;
use super::domain::{CatalogueError, CatalogueItem, Kind, ServiceDescriptor};

/// Catalogue operations used by the rest of the crate.
#[async_trait]
pub trait CatalogueApi: Send + Sync {
    /// Resolve an arbitrary streaming link.
    async fn resolve_link(&self, link: &str) -> Result<ResolvedLink, CatalogueError>;

    /// Fetch all items sharing a group id.
    async fn get_group(&self, group_id: &str) -> Result<Vec<CatalogueItem>, CatalogueError>;

    /// Fetch items by a kind-specific external id.
    async fn get_items_by_external_id(
        &self,
        kind: Kind,
        id: &str,
    ) -> Result<Vec<CatalogueItem>, CatalogueError>;

    /// Fetch the full service directory.
    async fn list_services(&self) -> Result<Vec<ServiceDescriptor>, CatalogueError>;
}

#[async_trait]
impl CatalogueApi for super::client::CatalogueClient {
    async fn resolve_link(&self, link: &str) -> Result<ResolvedLink, CatalogueError> {
        self.resolve_link(link).await
    }

    async fn get_group(&self, group_id: &str) -> Result<Vec<CatalogueItem>, CatalogueError> {
        self.get_group(group_id).await
    }

    async fn get_items_by_external_id(
        &self,
        kind: Kind,
        id: &str,
    ) -> Result<Vec<CatalogueItem>, CatalogueError> {
        self.get_items_by_external_id(kind, id).await
    }

    async fn list_services(&self) -> Result<Vec<ServiceDescriptor>, CatalogueError> {
        self.list_services().await
    }
}
