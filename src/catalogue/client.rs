//! Catalogue API HTTP client
//!
//! Talks to the backing catalogue service, which does the actual
//! cross-service matching. Every response is converted to domain types
//! before it leaves this file.
//!
//! No retries happen here - retry policy belongs to the caller.

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::adapter::{self, ResolvedLink};
use super::dto;
use crate::catalogue::domain::{CatalogueError, CatalogueItem, Kind, ServiceDescriptor};

/// User agent sent with every request
const USER_AGENT: &str = concat!("Maestro/", env!("CARGO_PKG_VERSION"));

/// Catalogue API client
pub struct CatalogueClient {
    http_client: reqwest::Client,
    base_url: String,
    /// Base URL consumers use to reach the API (e.g. through a proxy)
    public_base_url: String,
}

impl CatalogueClient {
    /// Create a client for the API at `base_url`.
    ///
    /// Logo URLs are rewritten against `public_base_url`, or `base_url`
    /// when no public URL is given.
    pub fn new(
        base_url: impl Into<String>,
        public_base_url: Option<String>,
    ) -> Result<Self, CatalogueError> {
        Self::with_timeout(base_url, public_base_url, None)
    }

    /// Same as [`CatalogueClient::new`], with an optional per-request timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        public_base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, CatalogueError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| CatalogueError::Unreachable(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        let public_base_url = public_base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| base_url.clone());

        Ok(Self {
            http_client,
            base_url,
            public_base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    /// Resolve an arbitrary streaming link to its kind and matching items
    pub async fn resolve_link(&self, link: &str) -> Result<ResolvedLink, CatalogueError> {
        let url = format!("{}/link?link={}", self.base_url, urlencoding::encode(link));
        let envelope: dto::EnvelopeDto = self.get_json(&url).await?;
        let resolved = adapter::to_resolved_link(envelope)?;

        if resolved.items.is_empty() {
            return Err(CatalogueError::NotFound);
        }
        Ok(resolved)
    }

    /// Fetch every item sharing a group id
    pub async fn get_group(&self, group_id: &str) -> Result<Vec<CatalogueItem>, CatalogueError> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(group_id));
        let response: dto::ItemsResponse = self.get_json(&url).await?;
        adapter::to_items(response)
    }

    /// Fetch items by a kind-specific id (artist id, album id or ISRC)
    pub async fn get_items_by_external_id(
        &self,
        kind: Kind,
        id: &str,
    ) -> Result<Vec<CatalogueItem>, CatalogueError> {
        let url = format!("{}/{}/{}", self.base_url, kind, urlencoding::encode(id));
        let envelope: dto::EnvelopeDto = self.get_json(&url).await?;
        let resolved = adapter::to_resolved_link(envelope)?;

        if resolved.kind != kind {
            return Err(CatalogueError::contract_violation(kind, resolved.kind));
        }
        Ok(resolved.items)
    }

    /// Fetch the full service directory with consumer-reachable logo URLs
    pub async fn list_services(&self) -> Result<Vec<ServiceDescriptor>, CatalogueError> {
        let url = format!("{}/services", self.base_url);
        let services: Vec<dto::ServiceDto> = self.get_json(&url).await?;

        Ok(services
            .into_iter()
            .map(|svc| adapter::to_service(svc, &self.public_base_url))
            .collect())
    }

    /// Send a GET request and decode the JSON body, mapping failures
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogueError> {
        tracing::debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogueError::Unreachable(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogueError::NotFound);
        }

        if !status.is_success() {
            // Try to parse error response
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(CatalogueError::BackendError(error.error));
            }
            return Err(CatalogueError::BackendError(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        // A connection dropped mid-body is a transport failure, not bad JSON
        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogueError::Unreachable(e.to_string()))?;

        serde_json::from_slice::<T>(&body)
            .map_err(|e| CatalogueError::BackendError(format!("invalid response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(server: &Server) -> CatalogueClient {
        CatalogueClient::new(server.url(), Some("https://maestro.example.com/api".to_string()))
            .expect("client should build")
    }

    fn track_json(group: &str, source: &str, artwork: &str) -> serde_json::Value {
        json!({
            "GroupId": group,
            "Source": source,
            "Market": "AU",
            "Link": format!("https://{}.example.com/track/1", source),
            "ArtworkLink": artwork,
            "Name": "Song",
            "ArtistNames": ["Artist"],
            "AlbumName": "Album",
            "Isrc": "ISRC1"
        })
    }

    #[test]
    fn test_client_trims_base_urls() {
        let client = CatalogueClient::new("http://localhost:8080/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.public_base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_user_agent_format() {
        assert!(USER_AGENT.starts_with("Maestro/"));
    }

    #[tokio::test]
    async fn test_resolve_link_encodes_link() {
        let mut server = Server::new_async().await;
        let link = "https://open.spotify.com/track/abc123?si=x&y=1";

        let mock = server
            .mock("GET", "/link")
            .match_query(Matcher::UrlEncoded("link".into(), link.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"Type": "track", "Items": [track_json("g1", "spotify", "a")]}).to_string())
            .create_async()
            .await;

        let resolved = client_for(&server).resolve_link(link).await.unwrap();

        mock.assert_async().await;
        assert_eq!(resolved.kind, Kind::Track);
        assert_eq!(resolved.items[0].group_id, "g1");
    }

    #[tokio::test]
    async fn test_resolve_link_with_no_items_is_not_found() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/link")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"Type": "track", "Items": []}).to_string())
            .create_async()
            .await;

        let result = client_for(&server).resolve_link("https://x.example.com").await;
        assert_eq!(result, Err(CatalogueError::NotFound));
    }

    #[tokio::test]
    async fn test_backend_error_message_surfaces_verbatim() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/link")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(json!({"Error": "unsupported link"}).to_string())
            .create_async()
            .await;

        let result = client_for(&server).resolve_link("nope").await;
        assert_eq!(result, Err(CatalogueError::BackendError("unsupported link".to_string())));
    }

    #[tokio::test]
    async fn test_status_without_error_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/g1")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let result = client_for(&server).get_group("g1").await;
        assert!(matches!(result, Err(CatalogueError::BackendError(msg)) if msg.starts_with("HTTP 502")));
    }

    #[tokio::test]
    async fn test_group_not_found() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body(json!({"Error": "could not find group with id missing"}).to_string())
            .create_async()
            .await;

        let result = client_for(&server).get_group("missing").await;
        assert_eq!(result, Err(CatalogueError::NotFound));
    }

    #[tokio::test]
    async fn test_group_accepts_flat_list() {
        let mut server = Server::new_async().await;
        let mut first = track_json("g1", "spotify", "a");
        first["ThingType"] = json!("track");
        let mut second = track_json("g1", "apple_music", "");
        second["ThingType"] = json!("track");

        let _m = server
            .mock("GET", "/g1")
            .with_status(200)
            .with_body(json!([first, second]).to_string())
            .create_async()
            .await;

        let items = client_for(&server).get_group("g1").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].service_key, "apple_music");
    }

    #[tokio::test]
    async fn test_external_id_lookup() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/album/42")
            .with_status(200)
            .with_body(
                json!({"Type": "album", "Items": [{
                    "GroupId": "g3", "Source": "deezer", "Link": "l", "Name": "Album",
                    "ArtistNames": ["A"], "AlbumId": "42"
                }]})
                .to_string(),
            )
            .create_async()
            .await;

        let items = client_for(&server)
            .get_items_by_external_id(Kind::Album, "42")
            .await
            .unwrap();
        assert_eq!(items[0].external_id(), "42");
        assert_eq!(items[0].kind(), Kind::Album);
    }

    #[tokio::test]
    async fn test_external_id_kind_mismatch() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/artist/42")
            .with_status(200)
            .with_body(json!({"Type": "album", "Items": []}).to_string())
            .create_async()
            .await;

        let result = client_for(&server)
            .get_items_by_external_id(Kind::Artist, "42")
            .await;
        assert!(matches!(result, Err(CatalogueError::BackendError(_))));
    }

    #[tokio::test]
    async fn test_list_services_rewrites_logos() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/services")
            .with_status(200)
            .with_body(
                json!([
                    {"Key": "spotify", "Name": "Spotify", "Enabled": true},
                    {"Key": "apple_music", "Name": "Apple Music", "Enabled": false}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let services = client_for(&server).list_services().await.unwrap();

        assert_eq!(services.len(), 2);
        assert_eq!(
            services[0].logo_url.as_deref(),
            Some("https://maestro.example.com/api/services/spotify/logo")
        );
        assert!(!services[1].enabled);
    }

    #[tokio::test]
    async fn test_invalid_body_is_backend_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/services")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let result = client_for(&server).list_services().await;
        assert!(matches!(result, Err(CatalogueError::BackendError(msg)) if msg.starts_with("invalid response")));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // Port 9 (discard) on localhost is not listening in test environments
        let client = CatalogueClient::new("http://127.0.0.1:9", None).unwrap();
        let result = client.list_services().await;
        assert!(matches!(result, Err(CatalogueError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_connection_dropped_mid_body_is_unreachable() {
        use std::io::{Read, Write};

        // Promise 100 bytes of JSON, send a few, then hang up
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);
            let _ = stream.write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n[{\"Key\":",
            );
        });

        let client = CatalogueClient::new(format!("http://{}", addr), None).unwrap();
        let result = client.list_services().await;
        server.join().unwrap();

        assert!(matches!(result, Err(CatalogueError::Unreachable(_))), "got {:?}", result);
    }
}
