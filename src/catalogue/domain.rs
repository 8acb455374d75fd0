//! Internal domain models for catalogue items and streaming services.
//!
//! These types are OUR types - they don't change when the catalogue API changes.
//! Every API response gets converted into these types via the adapter.

use std::fmt;
use std::str::FromStr;

/// The kind of musical entity a catalogue item represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Artist,
    Album,
    Track,
}

impl Kind {
    /// Wire name, also used as the path segment for external id lookups
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Artist => "artist",
            Kind::Album => "album",
            Kind::Track => "track",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = CatalogueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "artist" => Ok(Kind::Artist),
            "album" => Ok(Kind::Album),
            "track" => Ok(Kind::Track),
            _ => Err(CatalogueError::NotFound),
        }
    }
}

/// Kind-specific fields of a catalogue item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemDetails {
    Artist {
        artist_id: String,
    },
    Album {
        album_id: String,
        artist_names: Vec<String>,
    },
    Track {
        isrc: String,
        artist_names: Vec<String>,
        album_name: String,
    },
}

/// One streaming service's representation of an artist, album or track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueItem {
    /// Cross-service identity shared by every item in the group
    pub group_id: String,
    /// Key of the service this item belongs to (e.g. "spotify")
    pub service_key: String,
    /// Market/region code the item was found in
    pub market: String,
    /// Deep link into the streaming service
    pub link: String,
    /// Artwork URL, empty when the service had none
    pub artwork_link: String,
    pub display_name: String,
    pub details: ItemDetails,
}

impl CatalogueItem {
    pub fn kind(&self) -> Kind {
        match self.details {
            ItemDetails::Artist { .. } => Kind::Artist,
            ItemDetails::Album { .. } => Kind::Album,
            ItemDetails::Track { .. } => Kind::Track,
        }
    }

    /// Id accepted by the kind-specific lookup (artist id, album id or ISRC)
    pub fn external_id(&self) -> &str {
        match &self.details {
            ItemDetails::Artist { artist_id } => artist_id,
            ItemDetails::Album { album_id, .. } => album_id,
            ItemDetails::Track { isrc, .. } => isrc,
        }
    }

    /// Credited artists; empty for artist items
    pub fn artist_names(&self) -> &[String] {
        match &self.details {
            ItemDetails::Artist { .. } => &[],
            ItemDetails::Album { artist_names, .. } => artist_names,
            ItemDetails::Track { artist_names, .. } => artist_names,
        }
    }

    pub fn has_artwork(&self) -> bool {
        !self.artwork_link.is_empty()
    }
}

/// Display metadata for a participating streaming service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Stable, globally unique key (e.g. "apple_music")
    pub key: String,
    pub display_name: String,
    /// Logo URL reachable by the consumer, `None` when unknown
    pub logo_url: Option<String>,
    pub enabled: bool,
}

/// Display name given to services missing from the directory
pub const UNKNOWN_SERVICE_NAME: &str = "Unknown";

impl ServiceDescriptor {
    /// Sentinel for an item whose service the directory doesn't know about
    pub fn unknown(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_name: UNKNOWN_SERVICE_NAME.to_string(),
            logo_url: None,
            enabled: false,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.logo_url.is_none() && self.display_name == UNKNOWN_SERVICE_NAME
    }
}

/// Errors surfaced by catalogue operations.
///
/// `Clone` so a single in-flight directory fetch can hand its failure to
/// every waiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueError {
    #[error("Nothing found")]
    NotFound,

    #[error("Catalogue unreachable: {0}")]
    Unreachable(String),

    #[error("{0}")]
    BackendError(String),
}

impl CatalogueError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogueError::NotFound)
    }

    pub fn contract_violation(expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        CatalogueError::BackendError(format!(
            "API contract violation: expected {}, got {}",
            expected, actual
        ))
    }
}

/// Pick the representative item for the preview: the first one with artwork.
///
/// Returns `None` when no item has artwork; callers decide the fallback.
pub fn select_best_item(items: &[CatalogueItem]) -> Option<&CatalogueItem> {
    items.iter().find(|item| item.has_artwork())
}

/// Join names for display: "A", "A and B", "A, B and C".
pub fn format_names<S: AsRef<str>>(names: &[S]) -> String {
    let names: Vec<&str> = names.iter().map(|name| name.as_ref()).collect();
    match names.as_slice() {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
