//! Resolution pipeline: link (or group / external id) in, display-ready group out.
//!
//! 1. Fetch the group's items from the catalogue
//! 2. Pick the best item for the preview (falls back to the first item)
//! 3. Pair every item with its service descriptor (falls back to "Unknown")
//!
//! Item order from the catalogue is preserved throughout.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use futures::future::join_all;

use crate::catalogue::{
    CatalogueApi, CatalogueError, CatalogueItem, Kind, ServiceDescriptor, format_names,
    select_best_item,
};
use crate::directory::ServiceDirectory;

/// What the caller wants resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveInput {
    /// A streaming link pasted by the user
    Link(String),
    /// A canonical group id
    Group(String),
    /// A kind-specific id (artist id, album id or ISRC)
    External { kind: Kind, id: String },
}

impl ResolveInput {
    /// Classify raw user input.
    ///
    /// Absolute http(s) URLs are links, `artist/<id>`, `album/<id>` and
    /// `track/<id>` are external ids, anything else is a group id.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if let Ok(url) = reqwest::Url::parse(raw) {
            if matches!(url.scheme(), "http" | "https") {
                return ResolveInput::Link(raw.to_string());
            }
        }

        let path = raw.trim_start_matches('/');
        if let Some((kind, id)) = path.split_once('/') {
            if let Ok(kind) = kind.parse::<Kind>() {
                if !id.is_empty() {
                    return ResolveInput::External {
                        kind,
                        id: id.to_string(),
                    };
                }
            }
        }

        ResolveInput::Group(path.to_string())
    }
}

impl fmt::Display for ResolveInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveInput::Link(link) => write!(f, "link {}", link),
            ResolveInput::Group(id) => write!(f, "group {}", id),
            ResolveInput::External { kind, id } => write!(f, "{} {}", kind, id),
        }
    }
}

/// A catalogue item paired with its service's display metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLink {
    pub item: CatalogueItem,
    /// The directory entry, or [`ServiceDescriptor::unknown`] if there was none
    pub service: ServiceDescriptor,
}

/// A fully resolved group, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGroup {
    pub kind: Kind,
    /// Representative item for the preview
    pub best: CatalogueItem,
    /// Every representation, in catalogue order
    pub items: Vec<ServiceLink>,
}

impl ResolvedGroup {
    pub fn group_id(&self) -> &str {
        &self.best.group_id
    }

    /// "Name" for artists, "Name by A and B" for albums and tracks
    pub fn title(&self) -> String {
        match self.kind {
            Kind::Artist => self.best.display_name.clone(),
            Kind::Album | Kind::Track => {
                let names = self.best.artist_names();
                if names.is_empty() {
                    self.best.display_name.clone()
                } else {
                    format!("{} by {}", self.best.display_name, format_names(names))
                }
            }
        }
    }

    /// Share-card blurb, e.g. "Find Song by A on 2 streaming services!"
    pub fn description(&self) -> String {
        let count = self.items.len();
        format!(
            "Find {} on {} streaming service{}!",
            self.title(),
            count,
            if count == 1 { "" } else { "s" }
        )
    }

    /// Path to share: `/<kind>/<external id>` when known, else `/<group id>`
    pub fn share_path(&self) -> String {
        let external_id = self.best.external_id();
        if external_id.is_empty() {
            format!("/{}", urlencoding::encode(self.group_id()))
        } else {
            format!("/{}/{}", self.kind, urlencoding::encode(external_id))
        }
    }
}

/// Resolves inputs against the catalogue and annotates them from the directory
#[derive(Clone)]
pub struct Resolver {
    api: Arc<dyn CatalogueApi>,
    directory: ServiceDirectory,
}

impl Resolver {
    pub fn new(api: Arc<dyn CatalogueApi>, directory: ServiceDirectory) -> Self {
        Self { api, directory }
    }

    pub fn directory(&self) -> &ServiceDirectory {
        &self.directory
    }

    /// Ad-hoc service lookup through the directory cache
    pub async fn get_service(&self, key: &str) -> Result<ServiceDescriptor, CatalogueError> {
        self.directory.get_service(key).await
    }

    /// Resolve an input to a display-ready group.
    ///
    /// An empty result is `NotFound`, never an empty group.
    pub async fn resolve(&self, input: &ResolveInput) -> Result<ResolvedGroup, CatalogueError> {
        tracing::debug!("Resolving {}", input);

        let items = self.fetch_items(input).await?;
        let items = check_group(items)?;

        let Some(first) = items.first() else {
            tracing::debug!("Nothing found for {}", input);
            return Err(CatalogueError::NotFound);
        };
        let kind = first.kind();

        let best = match select_best_item(&items) {
            Some(best) => best.clone(),
            None => {
                tracing::debug!("No item has artwork, using the first one");
                first.clone()
            }
        };

        let services = join_all(items.iter().map(|item| self.describe(&item.service_key))).await;
        let items = items
            .into_iter()
            .zip(services)
            .map(|(item, service)| ServiceLink { item, service })
            .collect();

        Ok(ResolvedGroup { kind, best, items })
    }

    async fn fetch_items(&self, input: &ResolveInput) -> Result<Vec<CatalogueItem>, CatalogueError> {
        match input {
            ResolveInput::Link(link) => {
                let resolved = self.api.resolve_link(link).await?;
                let group_id = resolved
                    .items
                    .first()
                    .map(|item| item.group_id.clone())
                    .unwrap_or_default();

                if group_id.is_empty() {
                    return Ok(resolved.items);
                }
                tracing::debug!("Link resolved to {} group {}", resolved.kind, group_id);
                self.api.get_group(&group_id).await
            }
            ResolveInput::Group(group_id) => self.api.get_group(group_id).await,
            ResolveInput::External { kind, id } => {
                self.api.get_items_by_external_id(*kind, id).await
            }
        }
    }

    /// Directory entry for a key, or the unknown sentinel
    async fn describe(&self, key: &str) -> ServiceDescriptor {
        match self.directory.get_service(key).await {
            Ok(service) => service,
            Err(CatalogueError::NotFound) => {
                tracing::debug!("No directory entry for service {:?}", key);
                ServiceDescriptor::unknown(key)
            }
            Err(e) => {
                tracing::warn!("Service lookup for {:?} failed: {}", key, e);
                ServiceDescriptor::unknown(key)
            }
        }
    }
}

/// Enforce the group invariants: one kind, one group id, one item per service.
///
/// Duplicate services keep their first item.
fn check_group(items: Vec<CatalogueItem>) -> Result<Vec<CatalogueItem>, CatalogueError> {
    let Some(first) = items.first() else {
        return Ok(items);
    };
    let kind = first.kind();
    let group_id = first.group_id.clone();

    let mut seen = HashSet::new();
    let mut checked = Vec::with_capacity(items.len());

    for item in items {
        if item.kind() != kind {
            return Err(CatalogueError::contract_violation(kind, item.kind()));
        }
        if item.group_id != group_id {
            return Err(CatalogueError::contract_violation(
                format!("group {}", group_id),
                format!("group {}", item.group_id),
            ));
        }
        if !seen.insert(item.service_key.clone()) {
            tracing::warn!(
                "Group {} has more than one {} item, keeping the first",
                group_id,
                item.service_key
            );
            continue;
        }
        checked.push(item);
    }

    Ok(checked)
}
