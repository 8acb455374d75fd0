//! Adapter layer: Convert catalogue DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! If the catalogue API changes its response format, only this file and
//! dto.rs need to change.

use super::dto;
use crate::catalogue::domain::{CatalogueError, CatalogueItem, ItemDetails, Kind, ServiceDescriptor};

/// Items of one response, all stamped with the same kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub kind: Kind,
    pub items: Vec<CatalogueItem>,
}

/// Convert an items response (envelope or legacy flat list) into domain items.
///
/// A flat list carries no envelope kind, so every item must name its own.
pub fn to_items(response: dto::ItemsResponse) -> Result<Vec<CatalogueItem>, CatalogueError> {
    match response {
        dto::ItemsResponse::Envelope(envelope) => Ok(to_resolved_link(envelope)?.items),
        dto::ItemsResponse::Flat(items) => {
            tracing::debug!("Catalogue answered with a flat item list (deprecated shape)");
            items.into_iter().map(|item| to_item(item, None)).collect()
        }
    }
}

/// Convert a typed envelope, stamping the envelope kind onto every item
pub fn to_resolved_link(envelope: dto::EnvelopeDto) -> Result<ResolvedLink, CatalogueError> {
    let kind: Kind = envelope.kind.parse()?;
    let items = envelope
        .items
        .into_iter()
        .map(|item| to_item(item, Some(kind)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResolvedLink { kind, items })
}

/// Convert a single item. `envelope_kind` wins when the item doesn't name one.
pub fn to_item(item: dto::ItemDto, envelope_kind: Option<Kind>) -> Result<CatalogueItem, CatalogueError> {
    let kind = match (item.thing_type.as_deref(), envelope_kind) {
        (Some(own), Some(expected)) => {
            let own: Kind = own
                .parse()
                .map_err(|_| CatalogueError::contract_violation(expected, own))?;
            if own != expected {
                return Err(CatalogueError::contract_violation(expected, own));
            }
            own
        }
        (Some(own), None) => own
            .parse()
            .map_err(|_| CatalogueError::contract_violation("artist, album or track", own))?,
        (None, Some(expected)) => expected,
        (None, None) => {
            return Err(CatalogueError::contract_violation("ThingType", "nothing"));
        }
    };

    let artist_names = item.artist_names.unwrap_or_default();
    let details = match kind {
        Kind::Artist => ItemDetails::Artist {
            artist_id: item.artist_id.unwrap_or_default(),
        },
        Kind::Album => ItemDetails::Album {
            album_id: item.album_id.unwrap_or_default(),
            artist_names,
        },
        Kind::Track => ItemDetails::Track {
            isrc: item.isrc.unwrap_or_default(),
            artist_names,
            album_name: item.album_name.unwrap_or_default(),
        },
    };

    Ok(CatalogueItem {
        group_id: item.group_id,
        service_key: item.source,
        market: item.market,
        link: item.link,
        artwork_link: item.artwork_link.unwrap_or_default(),
        display_name: item.name,
        details,
    })
}

/// Convert a service entry, pointing its logo at the consumer-reachable base URL
pub fn to_service(service: dto::ServiceDto, public_base_url: &str) -> ServiceDescriptor {
    let logo_url = logo_url(public_base_url, &service.key);
    ServiceDescriptor {
        key: service.key,
        display_name: service.name,
        logo_url: Some(logo_url),
        enabled: service.enabled.unwrap_or(true),
    }
}

/// Public logo location for a service key
pub fn logo_url(public_base_url: &str, key: &str) -> String {
    format!(
        "{}/services/{}/logo",
        public_base_url.trim_end_matches('/'),
        urlencoding::encode(key)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(thing_type: Option<&str>, source: &str) -> dto::ItemDto {
        dto::ItemDto {
            thing_type: thing_type.map(String::from),
            group_id: "g1".to_string(),
            source: source.to_string(),
            market: "AU".to_string(),
            link: format!("https://{}.example.com/x", source),
            artwork_link: Some("https://img.example.com/x.jpg".to_string()),
            name: "Name".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_envelope_stamps_kind() {
        let envelope = dto::EnvelopeDto {
            kind: "album".to_string(),
            items: vec![make_item(None, "spotify"), make_item(Some("album"), "deezer")],
        };

        let resolved = to_resolved_link(envelope).unwrap();

        assert_eq!(resolved.kind, Kind::Album);
        assert!(resolved.items.iter().all(|i| i.kind() == Kind::Album));
        assert_eq!(resolved.items[1].service_key, "deezer");
    }

    #[test]
    fn test_envelope_kind_conflict_is_backend_error() {
        let envelope = dto::EnvelopeDto {
            kind: "album".to_string(),
            items: vec![make_item(Some("track"), "spotify")],
        };

        let err = to_resolved_link(envelope).unwrap_err();
        assert!(matches!(err, CatalogueError::BackendError(msg) if msg.contains("contract")));
    }

    #[test]
    fn test_unknown_envelope_kind_is_not_found() {
        let envelope = dto::EnvelopeDto {
            kind: "unknown".to_string(),
            items: vec![],
        };
        assert_eq!(to_resolved_link(envelope), Err(CatalogueError::NotFound));
    }

    #[test]
    fn test_flat_list_requires_thing_type() {
        let response = dto::ItemsResponse::Flat(vec![make_item(None, "spotify")]);
        assert!(matches!(to_items(response), Err(CatalogueError::BackendError(_))));
    }

    #[test]
    fn test_track_details() {
        let item = dto::ItemDto {
            artist_names: Some(vec!["A".to_string(), "B".to_string()]),
            album_name: Some("Album".to_string()),
            isrc: Some("ISRC1".to_string()),
            artwork_link: None,
            ..make_item(Some("track"), "spotify")
        };

        let item = to_item(item, None).unwrap();

        assert_eq!(item.external_id(), "ISRC1");
        assert_eq!(item.artist_names(), ["A".to_string(), "B".to_string()]);
        assert!(item.artwork_link.is_empty());
        assert_eq!(
            item.details,
            ItemDetails::Track {
                isrc: "ISRC1".to_string(),
                artist_names: vec!["A".to_string(), "B".to_string()],
                album_name: "Album".to_string(),
            }
        );
    }

    #[test]
    fn test_service_logo_rewritten() {
        let dto = dto::ServiceDto {
            key: "apple_music".to_string(),
            name: "Apple Music".to_string(),
            enabled: None,
            logo_url: Some("http://api:8080/internal/logo".to_string()),
        };

        let svc = to_service(dto, "https://maestro.example.com/api/");

        assert_eq!(
            svc.logo_url.as_deref(),
            Some("https://maestro.example.com/api/services/apple_music/logo")
        );
        assert!(svc.enabled);
        assert_eq!(svc.display_name, "Apple Music");
    }
}
