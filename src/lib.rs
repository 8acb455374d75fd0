//! Maestro - share music across streaming services.
//!
//! Paste a link to an artist, album or track on one streaming service and
//! get the equivalent links on every other service the catalogue knows.
//!
//! The cross-service matching itself happens in the backing catalogue API.
//! This crate resolves inputs against it, picks the item to preview, and
//! annotates each link with its service's name and logo from an in-memory
//! service directory.
//!
//! ```ignore
//! use std::sync::Arc;
//! use maestro::catalogue::{CatalogueApi, CatalogueClient};
//! use maestro::directory::{DirectoryConfig, ServiceDirectory};
//! use maestro::resolver::{ResolveInput, Resolver};
//!
//! let api: Arc<dyn CatalogueApi> = Arc::new(CatalogueClient::new("http://localhost:8080", None)?);
//! let directory = ServiceDirectory::new(api.clone(), DirectoryConfig::default());
//! let resolver = Resolver::new(api, directory);
//!
//! let group = resolver
//!     .resolve(&ResolveInput::parse("https://open.spotify.com/track/abc123"))
//!     .await?;
//! println!("{}", group.title());
//! ```

pub mod catalogue;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod resolver;
#[cfg(test)]
pub mod test_utils;

pub use catalogue::{CatalogueError, CatalogueItem, Kind, ServiceDescriptor};
pub use directory::ServiceDirectory;
pub use resolver::{ResolveInput, ResolvedGroup, Resolver, ServiceLink};
