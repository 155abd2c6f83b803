//! HTTP client for the wedding site backend.
//!
//! `BackendClient` is the production implementation of every service seam the
//! console uses:
//!
//! - `SiteStatusService`: read and update the site status record
//! - `MediaSource`: list uploaded media
//! - `MediaFetcher`: fetch the bytes of one image or video
//!
//! Non-success responses are turned into errors carrying status and body so
//! the raw backend message reaches the error dialogs.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::StreamExt;
use serde::Serialize;

use crate::config::{BackendConfig, DownloadsConfig};
use crate::demo::{demo_site_status, DemoMedia};
use crate::download::{MediaFetcher, ZipDownloader};
use crate::media::{MediaError, MediaItem, MediaSource};
use crate::site_status::{FeatureToggles, SiteStatus, SiteStatusError, SiteStatusService};

/// User agent for API requests
const USER_AGENT: &str = concat!("WeddingPix-Admin/", env!("CARGO_PKG_VERSION"));

const SITE_STATUS_PATH: &str = "/api/site-status";
const FEATURES_PATH: &str = "/api/site-status/features";
const MEDIA_PATH: &str = "/api/media";

/// Upper bound for the buffer reserved from a `Content-Length` header
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

fn initial_capacity(content_length: Option<u64>) -> usize {
    content_length.unwrap_or(0).min(MAX_PREALLOC) as usize
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteStatusUpdate<'a> {
    is_under_construction: bool,
    updated_by: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeatureUpdate<'a> {
    #[serde(flatten)]
    toggles: FeatureToggles,
    updated_by: &'a str,
}

/// Site backend API client
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl BackendClient {
    /// Create a new client from the backend settings
    pub fn new(config: &BackendConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path or a media URL as stored by the backend
    pub fn resolve_url(&self, path_or_url: &str) -> String {
        crate::panel::join_url(&self.base_url, path_or_url)
    }

    fn request(&self, method: reqwest::Method, path_or_url: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, self.resolve_url(path_or_url));
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<(), SiteStatusError> {
        let response = self
            .request(reqwest::Method::PUT, path)
            .json(body)
            .send()
            .await
            .map_err(|e| SiteStatusError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SiteStatusError::Server { status, body });
        }

        Ok(())
    }
}

#[async_trait]
impl SiteStatusService for BackendClient {
    async fn fetch_status(&self) -> Result<SiteStatus, SiteStatusError> {
        let response = self
            .request(reqwest::Method::GET, SITE_STATUS_PATH)
            .send()
            .await
            .map_err(|e| SiteStatusError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SiteStatusError::Server { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| SiteStatusError::InvalidResponse(e.to_string()))
    }

    async fn update_site_status(
        &self,
        under_construction: bool,
        actor: &str,
    ) -> Result<(), SiteStatusError> {
        tracing::debug!(
            "PUT {} under_construction={}",
            SITE_STATUS_PATH,
            under_construction
        );
        self.put_json(
            SITE_STATUS_PATH,
            &SiteStatusUpdate {
                is_under_construction: under_construction,
                updated_by: actor,
            },
        )
        .await
    }

    async fn update_feature_toggles(
        &self,
        toggles: FeatureToggles,
        actor: &str,
    ) -> Result<(), SiteStatusError> {
        tracing::debug!("PUT {} {:?}", FEATURES_PATH, toggles);
        self.put_json(
            FEATURES_PATH,
            &FeatureUpdate {
                toggles,
                updated_by: actor,
            },
        )
        .await
    }
}

#[async_trait]
impl MediaSource for BackendClient {
    async fn list_media(&self) -> Result<Vec<MediaItem>, MediaError> {
        let response = self
            .request(reqwest::Method::GET, MEDIA_PATH)
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Server { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| MediaError::Request(format!("Invalid media list: {}", e)))
    }
}

#[async_trait]
impl MediaFetcher for BackendClient {
    async fn fetch(&self, item: &MediaItem) -> Result<Vec<u8>, MediaError> {
        let url = item
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| MediaError::MissingUrl(item.id.clone()))?;

        let start = Instant::now();
        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Server { status, body });
        }

        let mut bytes = Vec::with_capacity(initial_capacity(response.content_length()));
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| MediaError::Request(e.to_string()))?;
            bytes.extend_from_slice(&chunk);
        }

        tracing::debug!(
            "Fetched {} ({} bytes) in {:.1}s",
            item.name,
            bytes.len(),
            start.elapsed().as_secs_f32()
        );
        Ok(bytes)
    }
}

/// The service seams the console and CLI run against
#[derive(Clone)]
pub struct Services {
    pub site: Arc<dyn SiteStatusService>,
    pub media: Arc<dyn MediaSource>,
    pub fetcher: Arc<dyn MediaFetcher>,
    /// Human-readable backend description
    pub label: String,
}

impl Services {
    /// Services backed by the configured HTTP backend
    pub fn connect(config: &BackendConfig) -> anyhow::Result<Self> {
        let client = Arc::new(BackendClient::new(config)?);
        tracing::info!("Using backend at {}", client.base_url());
        Ok(Self {
            label: format!("Backend: {}", client.base_url()),
            site: client.clone(),
            media: client.clone(),
            fetcher: client,
        })
    }

    /// Offline services with sample data
    pub fn demo() -> Self {
        let media = Arc::new(DemoMedia::default());
        tracing::info!("Using offline demo backend");
        Self {
            site: Arc::new(demo_site_status()),
            media: media.clone(),
            fetcher: media,
            label: "Demo-Modus (offline)".to_string(),
        }
    }

    pub fn from_config(config: &BackendConfig, demo: bool) -> anyhow::Result<Self> {
        if demo {
            Ok(Self::demo())
        } else {
            Self::connect(config)
        }
    }

    /// Archive writer for the configured download directory
    pub fn downloader(
        &self,
        downloads: &DownloadsConfig,
    ) -> anyhow::Result<ZipDownloader<Arc<dyn MediaFetcher>>> {
        Ok(ZipDownloader::new(
            self.fetcher.clone(),
            downloads.resolve_directory()?,
            downloads.compression_level,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> BackendClient {
        BackendClient::new(&BackendConfig {
            base_url: base_url.to_string(),
            api_token: Some(String::new()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = client("https://hochzeit.example/");
        assert_eq!(client.base_url(), "https://hochzeit.example");
        assert!(client.api_token.is_none());
    }

    #[test]
    fn test_resolve_url() {
        let client = client("https://hochzeit.example");
        assert_eq!(
            client.resolve_url(SITE_STATUS_PATH),
            "https://hochzeit.example/api/site-status"
        );
        assert_eq!(
            client.resolve_url("uploads/tanz.jpg"),
            "https://hochzeit.example/uploads/tanz.jpg"
        );
        assert_eq!(
            client.resolve_url("https://cdn.example/tanz.jpg"),
            "https://cdn.example/tanz.jpg"
        );
    }

    #[test]
    fn test_initial_capacity_is_capped() {
        assert_eq!(initial_capacity(None), 0);
        assert_eq!(initial_capacity(Some(4096)), 4096);
        assert_eq!(
            initial_capacity(Some(1024 * 1024 * 1024 * 1024)),
            MAX_PREALLOC as usize
        );
    }

    #[test]
    fn test_site_status_body() {
        let body = serde_json::to_value(SiteStatusUpdate {
            is_under_construction: false,
            updated_by: "Admin",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "isUnderConstruction": false, "updatedBy": "Admin" })
        );
    }

    #[test]
    fn test_feature_body_carries_all_flags() {
        let body = serde_json::to_value(FeatureUpdate {
            toggles: FeatureToggles {
                gallery: true,
                music_wishlist: false,
                stories: true,
            },
            updated_by: "Admin",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "galleryEnabled": true,
                "musicWishlistEnabled": false,
                "storiesEnabled": true,
                "updatedBy": "Admin"
            })
        );
    }

    #[tokio::test]
    async fn test_note_without_url_is_rejected() {
        let client = client("http://127.0.0.1:9");
        let mut note = crate::media::item("n1", crate::media::MediaKind::Note);
        note.url = None;
        assert!(matches!(
            client.fetch(&note).await,
            Err(MediaError::MissingUrl(id)) if id == "n1"
        ));
    }
}
