//! Site status record and the updater seam.
//!
//! The backend owns the record; the console only reads snapshots of it and
//! asks the backend to change it. A change becomes visible once the next
//! snapshot arrives, never by mutating the local copy.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by a site status backend
#[derive(Error, Debug, Clone)]
pub enum SiteStatusError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Server responded with {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Public access state and feature switches of the wedding site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteStatus {
    pub is_under_construction: bool,
    #[serde(default = "default_true")]
    pub gallery_enabled: bool,
    #[serde(default = "default_true")]
    pub music_wishlist_enabled: bool,
    #[serde(default = "default_true")]
    pub stories_enabled: bool,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for SiteStatus {
    fn default() -> Self {
        Self {
            is_under_construction: true,
            gallery_enabled: true,
            music_wishlist_enabled: true,
            stories_enabled: true,
            last_updated: None,
            updated_by: None,
        }
    }
}

impl SiteStatus {
    /// Short state word shown on the site status card
    pub fn access_word(&self) -> &'static str {
        if self.is_under_construction {
            "Gesperrt"
        } else {
            "Freigeschaltet"
        }
    }
}

/// Human-readable access label, or "Status unbekannt" without a snapshot
pub fn status_label(status: Option<&SiteStatus>) -> &'static str {
    match status {
        None => "Status unbekannt",
        Some(s) if s.is_under_construction => "🔒 Website ist gesperrt (Under Construction)",
        Some(_) => "🌐 Website ist freigeschaltet",
    }
}

/// One of the independently switchable site features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Gallery,
    MusicWishlist,
    Stories,
}

impl Feature {
    /// All features in display order
    pub fn all() -> &'static [Feature] {
        &[Feature::Gallery, Feature::MusicWishlist, Feature::Stories]
    }

    /// Card title
    pub fn label(&self) -> &'static str {
        match self {
            Feature::Gallery => "Gallery",
            Feature::MusicWishlist => "Music Wishlist",
            Feature::Stories => "Stories",
        }
    }

    /// German name used in tooltips and error messages
    pub fn german_name(&self) -> &'static str {
        match self {
            Feature::Gallery => "Galerie",
            Feature::MusicWishlist => "Musikwünsche",
            Feature::Stories => "Stories",
        }
    }

    /// Name accepted on the command line
    pub fn cli_name(&self) -> &'static str {
        match self {
            Feature::Gallery => "gallery",
            Feature::MusicWishlist => "music-wishlist",
            Feature::Stories => "stories",
        }
    }

    pub fn from_cli_name(name: &str) -> Option<Feature> {
        Feature::all()
            .iter()
            .copied()
            .find(|f| f.cli_name() == name.to_lowercase())
    }
}

/// The three feature flags as sent to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureToggles {
    #[serde(rename = "galleryEnabled")]
    pub gallery: bool,
    #[serde(rename = "musicWishlistEnabled")]
    pub music_wishlist: bool,
    #[serde(rename = "storiesEnabled")]
    pub stories: bool,
}

impl From<&SiteStatus> for FeatureToggles {
    fn from(status: &SiteStatus) -> Self {
        Self {
            gallery: status.gallery_enabled,
            music_wishlist: status.music_wishlist_enabled,
            stories: status.stories_enabled,
        }
    }
}

impl FeatureToggles {
    pub fn get(&self, feature: Feature) -> bool {
        match feature {
            Feature::Gallery => self.gallery,
            Feature::MusicWishlist => self.music_wishlist,
            Feature::Stories => self.stories,
        }
    }

    pub fn with(mut self, feature: Feature, enabled: bool) -> Self {
        match feature {
            Feature::Gallery => self.gallery = enabled,
            Feature::MusicWishlist => self.music_wishlist = enabled,
            Feature::Stories => self.stories = enabled,
        }
        self
    }

    /// Copy with exactly one flag negated
    pub fn with_toggled(self, feature: Feature) -> Self {
        let current = self.get(feature);
        self.with(feature, !current)
    }
}

/// Backend that stores the site status
#[async_trait]
pub trait SiteStatusService: Send + Sync {
    /// Read the current status
    async fn fetch_status(&self) -> Result<SiteStatus, SiteStatusError>;

    /// Lock (`true`) or unlock (`false`) public access
    async fn update_site_status(
        &self,
        under_construction: bool,
        actor: &str,
    ) -> Result<(), SiteStatusError>;

    /// Replace all three feature flags at once
    async fn update_feature_toggles(
        &self,
        toggles: FeatureToggles,
        actor: &str,
    ) -> Result<(), SiteStatusError>;
}

/// A call recorded by [`InMemorySiteStatus`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    SiteStatus { under_construction: bool, actor: String },
    FeatureToggles { toggles: FeatureToggles, actor: String },
}

#[derive(Debug, Default)]
struct InMemoryInner {
    status: SiteStatus,
    calls: Vec<RecordedCall>,
    failure: Option<String>,
}

/// In-process site status store.
///
/// Backs the `--demo` mode and tests. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct InMemorySiteStatus {
    inner: Arc<Mutex<InMemoryInner>>,
}

impl InMemorySiteStatus {
    pub fn new(status: SiteStatus) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InMemoryInner {
                status,
                ..Default::default()
            })),
        }
    }

    /// Make every update fail with the given message
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failure = Some(message.into());
        }
        self
    }

    /// Calls received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner
            .lock()
            .map(|inner| inner.calls.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, InMemoryInner>, SiteStatusError> {
        self.inner
            .lock()
            .map_err(|_| SiteStatusError::Request("status store poisoned".to_string()))
    }
}

#[async_trait]
impl SiteStatusService for InMemorySiteStatus {
    async fn fetch_status(&self) -> Result<SiteStatus, SiteStatusError> {
        Ok(self.lock()?.status.clone())
    }

    async fn update_site_status(
        &self,
        under_construction: bool,
        actor: &str,
    ) -> Result<(), SiteStatusError> {
        let mut inner = self.lock()?;
        inner.calls.push(RecordedCall::SiteStatus {
            under_construction,
            actor: actor.to_string(),
        });
        if let Some(msg) = &inner.failure {
            return Err(SiteStatusError::Request(msg.clone()));
        }
        inner.status.is_under_construction = under_construction;
        inner.status.updated_by = Some(actor.to_string());
        inner.status.last_updated = Some(Utc::now());
        Ok(())
    }

    async fn update_feature_toggles(
        &self,
        toggles: FeatureToggles,
        actor: &str,
    ) -> Result<(), SiteStatusError> {
        let mut inner = self.lock()?;
        inner.calls.push(RecordedCall::FeatureToggles {
            toggles,
            actor: actor.to_string(),
        });
        if let Some(msg) = &inner.failure {
            return Err(SiteStatusError::Request(msg.clone()));
        }
        inner.status.gallery_enabled = toggles.gallery;
        inner.status.music_wishlist_enabled = toggles.music_wishlist;
        inner.status.stories_enabled = toggles.stories;
        inner.status.updated_by = Some(actor.to_string());
        inner.status.last_updated = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label() {
        assert_eq!(status_label(None), "Status unbekannt");

        let locked = SiteStatus::default();
        assert_eq!(
            status_label(Some(&locked)),
            "🔒 Website ist gesperrt (Under Construction)"
        );

        let open = SiteStatus {
            is_under_construction: false,
            ..Default::default()
        };
        assert_eq!(status_label(Some(&open)), "🌐 Website ist freigeschaltet");
    }

    #[test]
    fn test_toggle_negates_only_one_flag() {
        let status = SiteStatus {
            gallery_enabled: true,
            music_wishlist_enabled: false,
            stories_enabled: true,
            ..Default::default()
        };
        let toggles = FeatureToggles::from(&status);

        let toggled = toggles.with_toggled(Feature::MusicWishlist);
        assert!(toggled.gallery);
        assert!(toggled.music_wishlist);
        assert!(toggled.stories);

        let toggled = toggles.with_toggled(Feature::Gallery);
        assert!(!toggled.gallery);
        assert!(!toggled.music_wishlist);
        assert!(toggled.stories);
    }

    #[test]
    fn test_site_status_json_shape() {
        let json = r#"{"isUnderConstruction":false,"galleryEnabled":false}"#;
        let status: SiteStatus = serde_json::from_str(json).unwrap();
        assert!(!status.is_under_construction);
        assert!(!status.gallery_enabled);
        assert!(status.music_wishlist_enabled);
        assert!(status.stories_enabled);

        let toggles = FeatureToggles::from(&status);
        let value = serde_json::to_value(toggles).unwrap();
        assert_eq!(value["galleryEnabled"], false);
        assert_eq!(value["musicWishlistEnabled"], true);
        assert_eq!(value["storiesEnabled"], true);
    }

    #[test]
    fn test_feature_cli_names() {
        assert_eq!(Feature::from_cli_name("gallery"), Some(Feature::Gallery));
        assert_eq!(Feature::from_cli_name("Music-Wishlist"), Some(Feature::MusicWishlist));
        assert_eq!(Feature::from_cli_name("photos"), None);
    }

    #[tokio::test]
    async fn test_in_memory_records_and_applies() {
        let store = InMemorySiteStatus::new(SiteStatus::default());
        store.update_site_status(false, "Admin").await.unwrap();

        let status = store.fetch_status().await.unwrap();
        assert!(!status.is_under_construction);
        assert_eq!(status.updated_by.as_deref(), Some("Admin"));
        assert_eq!(
            store.calls(),
            vec![RecordedCall::SiteStatus {
                under_construction: false,
                actor: "Admin".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_in_memory_failure_keeps_status() {
        let store = InMemorySiteStatus::new(SiteStatus::default()).with_failure("offline");
        let err = store.update_site_status(false, "Admin").await.unwrap_err();
        assert!(err.to_string().contains("offline"));
        assert!(store.fetch_status().await.unwrap().is_under_construction);
    }
}
