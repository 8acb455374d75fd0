//! Catalogue API Data Transfer Objects
//!
//! These types match EXACTLY what the catalogue API returns.
//! DO NOT use these types outside the catalogue module - convert to domain types.
//!
//! The API serializes Go structs as-is, so every field is PascalCase.

use serde::{Deserialize, Serialize};

/// A single catalogue item ("thing") as returned by the API
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemDto {
    /// "artist", "album" or "track"; omitted inside typed envelopes
    pub thing_type: Option<String>,
    #[serde(default)]
    pub group_id: String,
    /// Streaming service key
    pub source: String,
    #[serde(default)]
    pub market: String,
    pub link: String,
    #[serde(default)]
    pub artwork_link: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artist_names: Option<Vec<String>>,
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default)]
    pub artist_id: Option<String>,
    #[serde(default)]
    pub album_id: Option<String>,
    #[serde(default)]
    pub isrc: Option<String>,
}

/// Typed envelope: `{Type, Items}`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnvelopeDto {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(default)]
    pub items: Vec<ItemDto>,
}

/// Response body of the item endpoints.
///
/// Older endpoints answer with a bare list; that shape is only accepted for
/// compatibility and gets converted to the envelope by the adapter.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ItemsResponse {
    Envelope(EnvelopeDto),
    Flat(Vec<ItemDto>),
}

/// Streaming service entry from `/services`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceDto {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Backend-local logo URL; not reachable by consumers, gets rewritten
    #[serde(rename = "LogoURL", default)]
    pub logo_url: Option<String>,
}

/// Error response from the catalogue API
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiError {
    pub error: String,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
