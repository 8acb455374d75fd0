//! Catalogue module - talks to the backing catalogue API and defines the entity model.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - `CatalogueItem`, `ServiceDescriptor`, and the
//!   pure helpers for picking the best item and joining names
//! - **API DTOs** (`dto.rs`) - Exact API response shapes
//! - **Adapter** (`adapter.rs`) - Converts DTOs to domain models
//! - **Client** (`client.rs`) - HTTP client for the catalogue API
//! - **Traits** (`traits.rs`) - The `CatalogueApi` seam, plus mocks for tests
//!
//! # Usage
//!
//! ```ignore
//! use maestro::catalogue::CatalogueClient;
//!
//! let client = CatalogueClient::new("http://localhost:8080", None)?;
//! let resolved = client.resolve_link("https://open.spotify.com/track/abc123").await?;
//! println!("{} items for a {}", resolved.items.len(), resolved.kind);
//! ```

pub mod adapter;
pub mod client;
pub mod domain;
pub mod dto;
pub mod traits;

pub use adapter::ResolvedLink;
pub use client::CatalogueClient;
pub use domain::{
    CatalogueError, CatalogueItem, ItemDetails, Kind, ServiceDescriptor, format_names,
    select_best_item,
};
pub use traits::CatalogueApi;
