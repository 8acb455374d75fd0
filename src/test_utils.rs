//! Test utilities and fixtures for maestro tests.
//!
//! Builders for catalogue items and service descriptors with sensible
//! defaults. Customize with struct update syntax:
//!
//! ```ignore
//! let item = CatalogueItem {
//!     artwork_link: String::new(),
//!     ..track_item("g1", "spotify")
//! };
//! ```

use crate::catalogue::{CatalogueItem, ItemDetails, ServiceDescriptor};

fn base_item(group_id: &str, service_key: &str, details: ItemDetails) -> CatalogueItem {
    CatalogueItem {
        group_id: group_id.to_string(),
        service_key: service_key.to_string(),
        market: "AU".to_string(),
        link: format!("https://{}.example.com/{}", service_key, group_id),
        artwork_link: format!("https://img.example.com/{}/{}.jpg", service_key, group_id),
        display_name: "Test Name".to_string(),
        details,
    }
}

/// Artist item with artwork
pub fn artist_item(group_id: &str, service_key: &str) -> CatalogueItem {
    base_item(
        group_id,
        service_key,
        ItemDetails::Artist {
            artist_id: "artist-1".to_string(),
        },
    )
}

/// Album item with artwork, credited to two artists
pub fn album_item(group_id: &str, service_key: &str) -> CatalogueItem {
    base_item(
        group_id,
        service_key,
        ItemDetails::Album {
            album_id: "album-1".to_string(),
            artist_names: vec!["Artist A".to_string(), "Artist B".to_string()],
        },
    )
}

/// Track item with artwork
pub fn track_item(group_id: &str, service_key: &str) -> CatalogueItem {
    base_item(
        group_id,
        service_key,
        ItemDetails::Track {
            isrc: "ISRC0001".to_string(),
            artist_names: vec!["Test Artist".to_string()],
            album_name: "Test Album".to_string(),
        },
    )
}

/// Enabled service with a logo
pub fn service(key: &str, name: &str) -> ServiceDescriptor {
    ServiceDescriptor {
        key: key.to_string(),
        display_name: name.to_string(),
        logo_url: Some(format!("https://maestro.example.com/api/services/{}/logo", key)),
        enabled: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::Kind;

    #[test]
    fn test_fixture_defaults() {
        let item = track_item("g1", "spotify");
        assert_eq!(item.kind(), Kind::Track);
        assert!(item.has_artwork());
        assert!(item.link.contains("spotify"));

        let svc = service("spotify", "Spotify");
        assert!(!svc.is_unknown());
    }
}
