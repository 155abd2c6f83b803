//! Offline demo backend.
//!
//! Started with `--demo`. Site status lives in an [`InMemorySiteStatus`] and
//! a fixed set of guest uploads is served from memory, so every panel flow
//! can be tried without a running site backend.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::download::MediaFetcher;
use crate::media::{MediaError, MediaItem, MediaKind, MediaSource};
use crate::site_status::{InMemorySiteStatus, SiteStatus};

/// In-memory media listing with placeholder file contents
#[derive(Debug, Clone)]
pub struct DemoMedia {
    items: Arc<Vec<MediaItem>>,
}

impl DemoMedia {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }
}

impl Default for DemoMedia {
    fn default() -> Self {
        Self::new(sample_media())
    }
}

#[async_trait]
impl MediaSource for DemoMedia {
    async fn list_media(&self) -> Result<Vec<MediaItem>, MediaError> {
        Ok(self.items.as_ref().clone())
    }
}

#[async_trait]
impl MediaFetcher for DemoMedia {
    async fn fetch(&self, item: &MediaItem) -> Result<Vec<u8>, MediaError> {
        if item.url.is_none() {
            return Err(MediaError::MissingUrl(item.id.clone()));
        }
        Ok(format!("Demo-Inhalt von {} ({})\n", item.name, item.id).into_bytes())
    }
}

/// Site status store seeded the way a fresh site starts: locked, all features on
pub fn demo_site_status() -> InMemorySiteStatus {
    InMemorySiteStatus::new(SiteStatus {
        updated_by: Some("Demo".to_string()),
        last_updated: Some(Utc::now() - Duration::hours(2)),
        ..SiteStatus::default()
    })
}

/// A small wedding's worth of uploads
pub fn sample_media() -> Vec<MediaItem> {
    let now = Utc::now();
    let upload = |id: &str, kind: MediaKind, name: &str, by: &str, minutes_ago: i64| MediaItem {
        id: id.to_string(),
        kind,
        name: name.to_string(),
        url: match kind {
            MediaKind::Note => None,
            _ => Some(format!("/uploads/{}", name)),
        },
        note_text: None,
        uploaded_by: Some(by.to_string()),
        uploaded_at: Some(now - Duration::minutes(minutes_ago)),
    };

    let mut note_anna = upload("n1", MediaKind::Note, "Notiz", "Anna", 12);
    note_anna.note_text = Some("Was für ein wunderschöner Tag! Alles Liebe für euch beide.".to_string());
    let mut note_jonas = upload("n2", MediaKind::Note, "Notiz", "Jonas", 45);
    note_jonas.note_text = Some("Danke für die beste Party des Jahres!".to_string());

    vec![
        upload("i1", MediaKind::Image, "Trauung.jpg", "Anna", 180),
        upload("i2", MediaKind::Image, "Ringtausch.jpg", "Tante Gisela", 175),
        upload("i3", MediaKind::Image, "Gruppenfoto.jpg", "Jonas", 120),
        upload("v1", MediaKind::Video, "Eröffnungstanz.mp4", "Lena", 60),
        note_anna,
        note_jonas,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaCounts;

    #[tokio::test]
    async fn test_demo_media_lists_and_fetches() {
        let demo = DemoMedia::default();
        let items = demo.list_media().await.unwrap();
        let counts = MediaCounts::from_items(&items);
        assert_eq!((counts.images, counts.videos, counts.notes), (3, 1, 2));

        let bytes = demo.fetch(&items[0]).await.unwrap();
        assert!(String::from_utf8(bytes).unwrap().contains("Trauung.jpg"));

        let note = items.iter().find(|i| i.kind == MediaKind::Note).unwrap();
        assert!(demo.fetch(note).await.is_err());
    }

    #[tokio::test]
    async fn test_demo_site_starts_locked() {
        use crate::site_status::SiteStatusService;
        let status = demo_site_status().fetch_status().await.unwrap();
        assert!(status.is_under_construction);
        assert!(status.gallery_enabled);
    }
}
