//! # Catalog Client
//!
//! Keyed HTTP lookups against the remote track catalog: free-text search
//! and playlist listing. Both calls are thin wrappers over the injected
//! [`HttpClient`] bridge; every transport, status, or decode problem
//! collapses into the single [`CatalogError::FetchFailed`] shape.

use crate::error::{CatalogError, Result};
use crate::models::{PlaylistResponse, SearchResponse, Track};
use bridge_traits::{HttpClient, HttpMethod, HttpRequest};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Timeout for catalog requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the remote track catalog.
pub struct CatalogClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
}

impl CatalogClient {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Search tracks by free text. A blank query returns an empty list
    /// without touching the network.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Track>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let url = self.endpoint("search", &[("q", query)])?;
        let response: SearchResponse = self.get_json(url).await?;

        debug!(count = response.data.len(), "Catalog search results");
        Ok(response.data.into_iter().map(Track::from).collect())
    }

    /// Fetch the tracks of a playlist by id.
    #[instrument(skip(self))]
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<Vec<Track>> {
        let url = self.endpoint(&format!("playlist/{playlist_id}"), &[])?;
        let response: PlaylistResponse = self.get_json(url).await?;

        debug!(
            count = response.tracks.data.len(),
            "Catalog playlist tracks"
        );
        Ok(response.tracks.data.into_iter().map(Track::from).collect())
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        let base = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let url = if params.is_empty() {
            Url::parse(&base)
        } else {
            Url::parse_with_params(&base, params)
        }
        .map_err(|e| CatalogError::FetchFailed(format!("invalid catalog URL: {e}")))?;
        Ok(url.into())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T> {
        let request = HttpRequest::new(HttpMethod::Get, url).timeout(REQUEST_TIMEOUT);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| CatalogError::FetchFailed(e.to_string()))?;

        if !response.is_success() {
            return Err(CatalogError::FetchFailed(format!(
                "HTTP {}",
                response.status
            )));
        }

        response
            .json()
            .map_err(|e| CatalogError::FetchFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::http::{HttpResponse, RetryPolicy};
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        Http {}

        #[async_trait]
        impl HttpClient for Http {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
            async fn execute_with_retry(
                &self,
                request: HttpRequest,
                policy: RetryPolicy,
            ) -> BridgeResult<HttpResponse>;
        }
    }

    fn response(status: u16, body: &'static str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[tokio::test]
    async fn search_maps_nested_wire_tracks() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .withf(|req| req.url.contains("/search?q=daft+punk"))
            .times(1)
            .returning(|_| {
                Ok(response(
                    200,
                    r#"{"data": [{
                        "id": 1,
                        "title": "One More Time",
                        "artist": {"name": "Daft Punk"},
                        "album": {"cover_medium": "https://cdn/a.jpg"},
                        "preview": "https://cdn/p.mp3"
                    }]}"#,
                ))
            });

        let client = CatalogClient::new(Arc::new(http), "https://api.deezer.com");
        let tracks = client.search("daft punk").await.unwrap();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "One More Time");
        assert_eq!(tracks[0].artist, "Daft Punk");
        assert_eq!(tracks[0].preview_url.as_deref(), Some("https://cdn/p.mp3"));
    }

    #[tokio::test]
    async fn blank_query_short_circuits() {
        let mut http = MockHttp::new();
        http.expect_execute().times(0);

        let client = CatalogClient::new(Arc::new(http), "https://api.deezer.com");
        assert!(client.search("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn playlist_unwraps_tracks_container() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .withf(|req| req.url.ends_with("/playlist/908622995"))
            .returning(|_| {
                Ok(response(
                    200,
                    r#"{"tracks": {"data": [
                        {"id": 2, "title": "A", "artist": {"name": "X"}, "preview": "https://cdn/a.mp3"},
                        {"id": 3, "title": "B", "artist": {"name": "Y"}, "preview": null}
                    ]}}"#,
                ))
            });

        let client = CatalogClient::new(Arc::new(http), "https://api.deezer.com");
        let tracks = client.get_playlist("908622995").await.unwrap();

        assert_eq!(tracks.len(), 2);
        assert!(tracks[0].has_preview());
        assert!(!tracks[1].has_preview());
    }

    #[tokio::test]
    async fn http_error_status_is_fetch_failed() {
        let mut http = MockHttp::new();
        http.expect_execute().returning(|_| Ok(response(503, "")));

        let client = CatalogClient::new(Arc::new(http), "https://api.deezer.com");
        let err = client.search("query").await.unwrap_err();
        assert!(matches!(err, CatalogError::FetchFailed(_)));
    }

    #[tokio::test]
    async fn transport_failure_is_fetch_failed() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .returning(|_| Err(BridgeError::OperationFailed("connection refused".into())));

        let client = CatalogClient::new(Arc::new(http), "https://api.deezer.com");
        assert!(client.get_playlist("1").await.is_err());
    }

    #[tokio::test]
    async fn malformed_json_is_fetch_failed() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .returning(|_| Ok(response(200, "not json at all")));

        let client = CatalogClient::new(Arc::new(http), "https://api.deezer.com");
        let err = client.search("query").await.unwrap_err();
        assert!(matches!(err, CatalogError::FetchFailed(_)));
    }
}
